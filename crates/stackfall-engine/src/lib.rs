pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Errors reported by [`GameSession`] operations.
///
/// A move that is merely illegal (blocked by a wall or the stack) is not an
/// error; it reports [`StepOutcome::Rejected`] instead.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SessionError {
    #[display("invalid tick delta: {delta} (must be finite and non-negative)")]
    InvalidInput {
        #[error(not(source))]
        delta: f64,
    },
    #[display("cannot {command} while session is {state}")]
    IllegalStateTransition {
        #[error(not(source))]
        command: Command,
        #[error(not(source))]
        state: SessionState,
    },
    #[display("cannot start session: already {state}")]
    NotReady {
        #[error(not(source))]
        state: SessionState,
    },
}
