use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{ActivePiece, Board};

use super::SessionState;

/// Read-only view of a session, taken once per frame by a renderer.
///
/// Nothing here borrows from the session, so a snapshot can be kept,
/// serialized, or sent to another thread while the session keeps running.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionSnapshot {
    pub board: Board,
    pub current: ActivePiece,
    pub next: ActivePiece,
    pub score: usize,
    pub level: usize,
    pub total_cleared_lines: usize,
    /// Seconds between gravity steps.
    pub fall_interval: f64,
    pub state: SessionState,
}

impl SessionSnapshot {
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Returns the board with the falling piece drawn in.
    ///
    /// Cells of the piece above the top row are left out.
    #[must_use]
    pub fn composited_board(&self) -> Board {
        let mut board = self.board.clone();
        let _overflow = board.merge(&self.current);
        board
    }
}

impl fmt::Display for SessionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.composited_board())?;
        writeln!(
            f,
            "score: {}  level: {}  lines: {}  next: {}",
            self.score,
            self.level,
            self.total_cleared_lines,
            self.next.kind()
        )?;
        write!(f, "state: {}", self.state)
    }
}
