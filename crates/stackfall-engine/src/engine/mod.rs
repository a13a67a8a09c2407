//! Game session logic and state management.
//!
//! This module drives the core data structures through a game:
//!
//! - [`GameSession`] - Board, falling and next pieces, statistics, lifecycle
//! - [`Command`] - Discrete player input
//! - [`StepOutcome`] / [`LockEvent`] - What a tick or command did
//! - [`GameStats`] - Score, level, lines and fall interval
//! - [`PieceGenerator`] - Uniform, seeded piece draws
//! - [`SessionSnapshot`] - Read-only per-frame view for renderers
//! - [`ScoreRecord`] - Final result for a score store
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] (state `ready`) and call [`GameSession::start`]
//! 2. Each frame, feed elapsed seconds to [`GameSession::tick`]
//! 3. Between frames, [`GameSession::apply`] player commands
//! 4. Locked pieces clear full rows, score points and spawn the next piece
//! 5. Repeat until the stack reaches the top (state `over`)
//! 6. [`Command::Reset`] starts over from any state
//!
//! # Example
//!
//! ```
//! use stackfall_engine::{Command, GameSession};
//!
//! let mut session = GameSession::new();
//! session.start().unwrap();
//!
//! while !session.is_over() {
//!     session.apply(Command::HardDrop).unwrap();
//! }
//!
//! let record = session.final_record("player").unwrap();
//! assert_eq!(record.level, 1);
//! ```

pub use self::{
    command::*, game_session::*, game_stats::*, piece_generator::*, record::*, snapshot::*,
};

mod command;
mod game_session;
mod game_stats;
mod piece_generator;
mod record;
mod snapshot;
