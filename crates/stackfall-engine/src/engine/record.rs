use serde::{Deserialize, Serialize};

/// Final result of a game, handed to a score store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ScoreRecord {
    pub player: String,
    pub score: usize,
    pub level: usize,
    pub total_cleared_lines: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_shape() {
        let record = ScoreRecord {
            player: "ada".to_owned(),
            score: 1300,
            level: 2,
            total_cleared_lines: 12,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "player": "ada",
                "score": 1300,
                "level": 2,
                "total_cleared_lines": 12,
            })
        );
    }
}
