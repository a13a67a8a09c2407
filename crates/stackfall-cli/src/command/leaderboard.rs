use std::path::PathBuf;

use log::warn;

use crate::{
    schema::record::SavedScore,
    util::{list_json_files, read_json_file},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LeaderboardArg {
    /// Directory containing saved score JSON files
    dir: PathBuf,
    /// Number of entries to show
    #[arg(long, default_value_t = 10)]
    top: usize,
}

pub(crate) fn run(arg: &LeaderboardArg) -> anyhow::Result<()> {
    let LeaderboardArg { dir, top } = arg;

    let mut scores = vec![];
    for path in list_json_files(dir)? {
        match read_json_file::<SavedScore, _>("score", &path) {
            Ok(score) => scores.push(score),
            Err(e) => warn!("skipping {}: {e:#}", path.display()),
        }
    }
    eprintln!("Loaded {} scores from {}", scores.len(), dir.display());

    println!(
        "{:>4}  {:<16} {:>8} {:>5} {:>5}  recorded at",
        "rank", "player", "score", "level", "lines"
    );
    for (i, saved) in rank(scores, *top).iter().enumerate() {
        let record = &saved.record;
        println!(
            "{:>4}  {:<16} {:>8} {:>5} {:>5}  {}",
            i + 1,
            record.player,
            record.score,
            record.level,
            record.total_cleared_lines,
            saved.recorded_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

/// Orders scores best first and keeps the first `top`.
///
/// Equal scores keep arrival order: the earlier `recorded_at` ranks higher.
fn rank(mut scores: Vec<SavedScore>, top: usize) -> Vec<SavedScore> {
    scores.sort_by(|a, b| {
        b.record
            .score
            .cmp(&a.record.score)
            .then_with(|| a.recorded_at.cmp(&b.recorded_at))
    });
    scores.truncate(top);
    scores
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone as _, Utc};
    use stackfall_engine::{GameSession, PieceSeed, ScoreRecord};

    use super::*;

    fn saved(player: &str, score: usize, recorded_at: DateTime<Utc>) -> SavedScore {
        let seed = PieceSeed::from_bytes([1; 16]);
        SavedScore {
            recorded_at,
            seed,
            record: ScoreRecord {
                player: player.to_owned(),
                score,
                level: 1,
                total_cleared_lines: 0,
            },
            final_snapshot: GameSession::with_seed(seed).snapshot(),
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap()
    }

    fn players(scores: &[SavedScore]) -> Vec<&str> {
        scores.iter().map(|s| s.record.player.as_str()).collect()
    }

    #[test]
    fn test_rank_by_score_descending() {
        let scores = vec![
            saved("low", 100, at(1)),
            saved("high", 900, at(2)),
            saved("mid", 500, at(3)),
        ];
        assert_eq!(players(&rank(scores, 10)), ["high", "mid", "low"]);
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let scores = vec![
            saved("late", 300, at(5)),
            saved("early", 300, at(1)),
            saved("middle", 300, at(3)),
        ];
        assert_eq!(players(&rank(scores, 10)), ["early", "middle", "late"]);
    }

    #[test]
    fn test_top_truncates() {
        let scores = (0..20).map(|i| saved("p", i * 10, at(1))).collect();
        let ranked = rank(scores, 3);
        assert_eq!(
            ranked.iter().map(|s| s.record.score).collect::<Vec<_>>(),
            [190, 180, 170]
        );
        assert!(rank(vec![], 3).is_empty());
    }

    #[test]
    fn test_saved_score_roundtrip() {
        let score = saved("ada", 1200, at(7));
        let json = serde_json::to_string(&score).unwrap();
        assert!(json.contains(r#""recorded_at":"2025-01-01T07:00:00Z""#));
        let parsed: SavedScore = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, score);
    }
}
