use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stackfall_engine::{PieceSeed, ScoreRecord, SessionSnapshot};

/// A finished game as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedScore {
    /// Timestamp when the score was saved (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    /// Random seed used for piece generation
    pub seed: PieceSeed,
    /// Player name and final statistics
    pub record: ScoreRecord,
    /// Session state at the time of saving
    pub final_snapshot: SessionSnapshot,
}
