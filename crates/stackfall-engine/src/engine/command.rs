use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::{BOARD_HEIGHT, PieceKind};

/// Discrete player input accepted by [`GameSession::apply`](super::GameSession::apply).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display)]
pub enum Command {
    #[display("move left")]
    MoveLeft,
    #[display("move right")]
    MoveRight,
    #[display("soft drop")]
    SoftDrop,
    #[display("rotate")]
    Rotate,
    #[display("hard drop")]
    HardDrop,
    #[display("reset")]
    Reset,
}

impl Command {
    pub const ALL: [Self; 6] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::SoftDrop,
        Command::Rotate,
        Command::HardDrop,
        Command::Reset,
    ];
}

/// What a tick or command did to the session.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum StepOutcome {
    /// Nothing changed (the fall timer has not elapsed, or the session is not
    /// running).
    Idle,
    /// The falling piece moved or rotated.
    Moved,
    /// The move or rotation was illegal and was discarded.
    Rejected,
    /// The falling piece locked into the board.
    Locked(LockEvent),
    /// The session was reinitialized.
    Reset,
}

impl StepOutcome {
    #[must_use]
    pub fn lock_event(&self) -> Option<&LockEvent> {
        match self {
            StepOutcome::Locked(event) => Some(event),
            _ => None,
        }
    }
}

/// Details of a piece locking into the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockEvent {
    /// Kind of the piece that locked.
    pub kind: PieceKind,
    /// Rows that were full after the merge, top to bottom, as indexed before
    /// they were cleared.
    pub cleared_rows: ArrayVec<usize, BOARD_HEIGHT>,
    /// Points awarded for the clear.
    pub points: usize,
    /// Whether the clear raised the level.
    pub level_up: bool,
    /// Whether this lock ended the game.
    pub topped_out: bool,
}

impl LockEvent {
    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_rows.len()
    }
}
