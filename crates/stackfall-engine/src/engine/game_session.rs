use log::{debug, info, trace};
use rand::Rng as _;
use serde::{Deserialize, Serialize};

use crate::{
    SessionError,
    core::{ActivePiece, Board},
};

use super::{
    Command, GameStats, LockEvent, ScoreRecord, SessionSnapshot, StepOutcome,
    piece_generator::{PieceGenerator, PieceSeed},
};

/// Lifecycle of a [`GameSession`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum SessionState {
    /// Fresh board with the first piece spawned; waiting for [`GameSession::start`].
    #[display("ready")]
    Ready,
    /// Gravity and input are active.
    #[display("running")]
    Running,
    /// The stack reached the top. Only [`Command::Reset`] is accepted.
    #[display("over")]
    Over,
}

/// A single game: board, falling and next pieces, statistics and lifecycle.
///
/// The session is driven from outside. The caller feeds elapsed time through
/// [`GameSession::tick`] once per frame and player input through
/// [`GameSession::apply`] between frames. Commands take effect immediately
/// and in the order they are applied.
///
/// # Example
///
/// ```
/// use stackfall_engine::{Command, GameSession, PieceSeed};
///
/// let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// let mut session = GameSession::with_seed(seed);
/// session.start().unwrap();
///
/// session.apply(Command::MoveLeft).unwrap();
/// let outcome = session.apply(Command::HardDrop).unwrap();
/// assert!(outcome.is_locked());
///
/// // Gravity advances once the fall interval has elapsed.
/// session.tick(0.25).unwrap();
/// session.tick(0.25).unwrap();
/// assert_eq!(session.current_piece().origin().y, 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    current: ActivePiece,
    next: ActivePiece,
    stats: GameStats,
    state: SessionState,
    fall_timer: f64,
    generator: PieceGenerator,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates a session in the [`SessionState::Ready`] state with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for a reproducible piece
    /// sequence.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let mut generator = PieceGenerator::with_seed(seed);
        let current = ActivePiece::spawn(generator.next_kind());
        let next = ActivePiece::spawn(generator.next_kind());
        Self {
            board: Board::EMPTY,
            current,
            next,
            stats: GameStats::new(),
            state: SessionState::Ready,
            fall_timer: 0.0,
            generator,
        }
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.generator.seed()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current_piece(&self) -> &ActivePiece {
        &self.current
    }

    #[must_use]
    pub fn next_piece(&self) -> &ActivePiece {
        &self.next
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    #[must_use]
    pub fn total_cleared_lines(&self) -> usize {
        self.stats.total_cleared_lines()
    }

    /// Seconds between gravity steps at the current level.
    #[must_use]
    pub fn fall_interval(&self) -> f64 {
        self.stats.fall_interval()
    }

    /// Moves a ready session into [`SessionState::Running`].
    pub fn start(&mut self) -> Result<(), SessionError> {
        if !self.state.is_ready() {
            return Err(SessionError::NotReady { state: self.state });
        }
        self.state = SessionState::Running;
        debug!(
            "session started: current {}, next {}",
            self.current.kind(),
            self.next.kind()
        );
        Ok(())
    }

    /// Advances the fall timer by `delta_seconds`.
    ///
    /// Once the accumulated time reaches the fall interval, the timer resets
    /// and the piece either falls one row or, if it is resting on something,
    /// locks. At most one step happens per call. Outside
    /// [`SessionState::Running`] this is a no-op.
    pub fn tick(&mut self, delta_seconds: f64) -> Result<StepOutcome, SessionError> {
        if !delta_seconds.is_finite() || delta_seconds < 0.0 {
            return Err(SessionError::InvalidInput {
                delta: delta_seconds,
            });
        }
        if !self.state.is_running() {
            return Ok(StepOutcome::Idle);
        }

        self.fall_timer += delta_seconds;
        if self.fall_timer < self.stats.fall_interval() {
            return Ok(StepOutcome::Idle);
        }
        self.fall_timer = 0.0;

        match self.shift(0, 1) {
            StepOutcome::Rejected => Ok(StepOutcome::Locked(self.lock_current())),
            outcome => Ok(outcome),
        }
    }

    /// Applies a player command.
    ///
    /// [`Command::Reset`] is accepted in every state. Every other command
    /// requires [`SessionState::Running`]. An illegal move is not an error;
    /// it reports [`StepOutcome::Rejected`] and leaves the session unchanged.
    pub fn apply(&mut self, command: Command) -> Result<StepOutcome, SessionError> {
        let outcome = match command {
            Command::Reset => {
                self.reset();
                StepOutcome::Reset
            }
            _ if !self.state.is_running() => {
                return Err(SessionError::IllegalStateTransition {
                    command,
                    state: self.state,
                });
            }
            Command::MoveLeft => self.shift(-1, 0),
            Command::MoveRight => self.shift(1, 0),
            Command::SoftDrop => self.shift(0, 1),
            Command::Rotate => self.rotate(),
            Command::HardDrop => self.hard_drop(),
        };
        Ok(outcome)
    }

    pub fn try_move_left(&mut self) -> Result<StepOutcome, SessionError> {
        self.apply(Command::MoveLeft)
    }

    pub fn try_move_right(&mut self) -> Result<StepOutcome, SessionError> {
        self.apply(Command::MoveRight)
    }

    pub fn try_soft_drop(&mut self) -> Result<StepOutcome, SessionError> {
        self.apply(Command::SoftDrop)
    }

    pub fn try_rotate(&mut self) -> Result<StepOutcome, SessionError> {
        self.apply(Command::Rotate)
    }

    pub fn try_hard_drop(&mut self) -> Result<StepOutcome, SessionError> {
        self.apply(Command::HardDrop)
    }

    /// Reinitializes the board, pieces and statistics and resumes running.
    ///
    /// The piece sequence continues from the session's generator rather than
    /// restarting from the seed.
    pub fn reset(&mut self) {
        self.board = Board::EMPTY;
        self.current = ActivePiece::spawn(self.generator.next_kind());
        self.next = ActivePiece::spawn(self.generator.next_kind());
        self.stats = GameStats::new();
        self.fall_timer = 0.0;
        // Passes through `Ready` without waiting for `start`.
        self.state = SessionState::Running;
        debug!(
            "session reset: current {}, next {}",
            self.current.kind(),
            self.next.kind()
        );
    }

    /// Takes a read-only copy of everything a renderer needs.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board.clone(),
            current: self.current,
            next: self.next,
            score: self.stats.score(),
            level: self.stats.level(),
            total_cleared_lines: self.stats.total_cleared_lines(),
            fall_interval: self.stats.fall_interval(),
            state: self.state,
        }
    }

    /// Builds a score record for `player` from the current statistics.
    #[must_use]
    pub fn score_record(&self, player: impl Into<String>) -> ScoreRecord {
        ScoreRecord {
            player: player.into(),
            score: self.stats.score(),
            level: self.stats.level(),
            total_cleared_lines: self.stats.total_cleared_lines(),
        }
    }

    /// Like [`Self::score_record`], but only once the game is over.
    #[must_use]
    pub fn final_record(&self, player: impl Into<String>) -> Option<ScoreRecord> {
        self.is_over().then(|| self.score_record(player))
    }

    fn shift(&mut self, dx: i32, dy: i32) -> StepOutcome {
        let origin = self.current.translate(dx, dy);
        if self.board.collides(self.current.shape(), origin.x, origin.y) {
            trace!("shift ({dx}, {dy}) rejected at {:?}", self.current.origin());
            return StepOutcome::Rejected;
        }
        self.current.set_origin(origin);
        StepOutcome::Moved
    }

    fn rotate(&mut self) -> StepOutcome {
        let shape = self.current.rotate();
        let origin = self.current.origin();
        if self.board.collides(&shape, origin.x, origin.y) {
            trace!("rotation rejected at {origin:?}");
            return StepOutcome::Rejected;
        }
        self.current.set_shape(shape);
        StepOutcome::Moved
    }

    fn hard_drop(&mut self) -> StepOutcome {
        self.current = self.current.drop_position(&self.board);
        self.fall_timer = 0.0;
        StepOutcome::Locked(self.lock_current())
    }

    fn lock_current(&mut self) -> LockEvent {
        let locked = self.current;
        let overflow = self.board.merge(&locked);
        let cleared_rows = self.board.full_rows();
        let cleared_lines = self.board.clear_full_lines();
        debug_assert_eq!(cleared_lines, cleared_rows.len());

        let level_before = self.stats.level();
        let points = self.stats.complete_piece_drop(cleared_lines);
        let level_up = self.stats.level() > level_before;

        let spawned = ActivePiece::spawn(self.generator.next_kind());
        self.current = std::mem::replace(&mut self.next, spawned);
        let origin = self.current.origin();
        let spawn_blocked = self.board.collides(self.current.shape(), origin.x, origin.y);
        let topped_out = overflow > 0 || spawn_blocked;

        debug!(
            "{} locked at {:?}: {cleared_lines} lines, +{points} points",
            locked.kind(),
            locked.origin()
        );
        if level_up {
            debug!("level up: {}", self.stats.level());
        }
        if topped_out {
            self.state = SessionState::Over;
            info!(
                "game over: score {}, level {}, lines {}",
                self.stats.score(),
                self.stats.level(),
                self.stats.total_cleared_lines()
            );
        }

        LockEvent {
            kind: locked.kind(),
            cleared_rows,
            points,
            level_up,
            topped_out,
        }
    }
}
