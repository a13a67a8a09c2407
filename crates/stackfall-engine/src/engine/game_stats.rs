use serde::{Deserialize, Serialize};

/// Base points for a line clear, indexed by `lines - 1`.
///
/// - 1 line: 100 points
/// - 2 lines: 200 points
/// - 3 lines: 500 points
/// - 4 lines: 1000 points
///
/// Clears of more than 4 lines score as 4.
pub const SCORE_TABLE: [usize; 4] = [100, 200, 500, 1000];

/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: usize = 10;

/// Seconds between gravity steps at level 1.
pub const BASE_FALL_INTERVAL: f64 = 0.5;

/// Fastest gravity: the fall interval never drops below this many seconds.
pub const MIN_FALL_INTERVAL: f64 = 0.1;

/// Seconds removed from the fall interval per level gained.
pub const FALL_INTERVAL_STEP: f64 = 0.05;

/// Returns the base (level 1) points for clearing `cleared_lines` at once.
///
/// ```
/// use stackfall_engine::line_clear_points;
///
/// assert_eq!(line_clear_points(0), 0);
/// assert_eq!(line_clear_points(3), 500);
/// assert_eq!(line_clear_points(6), 1000);
/// ```
#[must_use]
pub fn line_clear_points(cleared_lines: usize) -> usize {
    match cleared_lines {
        0 => 0,
        n => SCORE_TABLE[n.min(SCORE_TABLE.len()) - 1],
    }
}

/// Returns the level reached after clearing `total_cleared_lines`.
#[must_use]
pub const fn level_for_lines(total_cleared_lines: usize) -> usize {
    total_cleared_lines / LINES_PER_LEVEL + 1
}

/// Returns the gravity interval, in seconds, for `level`.
///
/// Starts at [`BASE_FALL_INTERVAL`], shrinks by [`FALL_INTERVAL_STEP`] per
/// level, and is floored at [`MIN_FALL_INTERVAL`].
#[must_use]
pub fn fall_interval_for_level(level: usize) -> f64 {
    let steps = u32::try_from(level.saturating_sub(1)).unwrap_or(u32::MAX);
    (BASE_FALL_INTERVAL - f64::from(steps) * FALL_INTERVAL_STEP).max(MIN_FALL_INTERVAL)
}

/// Game statistics tracking score, lines cleared, and piece count.
///
/// - **Score**: points earned from line clears, multiplied by the level at
///   the time of the clear
/// - **Level**: derived from total lines cleared (starts at 1, +1 per 10 lines)
/// - **Fall interval**: derived from the level
/// - **Completed pieces**: total number of pieces locked
/// - **Line clear distribution**: count of locks by lines cleared
///
/// # Example
///
/// ```
/// use stackfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// let points = stats.complete_piece_drop(4);
///
/// assert_eq!(points, 1000);
/// assert_eq!(stats.score(), 1000);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker: score 0, level 1, no lines.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the current level (1-based).
    #[must_use]
    pub const fn level(&self) -> usize {
        level_for_lines(self.total_cleared_lines)
    }

    /// Returns the current gravity interval in seconds.
    #[must_use]
    pub fn fall_interval(&self) -> f64 {
        fall_interval_for_level(self.level())
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by lines cleared.
    ///
    /// Index `n` counts locks that cleared `n` lines; index 4 also absorbs
    /// anything larger.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece locks and returns the points awarded.
    ///
    /// Points are scored at the level in effect *before* this lock's lines
    /// are counted.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) -> usize {
        let points = line_clear_points(cleared_lines) * self.level();
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        self.line_cleared_counter[cleared_lines.min(4)] += 1;
        self.score += points;
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_interval(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected fall interval {expected}, got {actual}"
        );
    }

    fn stats_at_lines(lines: usize) -> GameStats {
        let mut stats = GameStats::new();
        for _ in 0..lines {
            stats.complete_piece_drop(1);
        }
        stats
    }

    #[test]
    fn test_initial_stats() {
        let stats = GameStats::new();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.total_cleared_lines(), 0);
        assert_eq!(stats.completed_pieces(), 0);
        assert_interval(stats.fall_interval(), 0.5);
    }

    #[test]
    fn test_no_lines_no_points() {
        let mut stats = GameStats::new();
        assert_eq!(stats.complete_piece_drop(0), 0);
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.completed_pieces(), 1);
        assert_eq!(stats.line_cleared_counter()[0], 1);
    }

    #[test]
    fn test_score_scales_with_level() {
        let mut stats = stats_at_lines(20);
        assert_eq!(stats.level(), 3);
        let before = stats.score();

        assert_eq!(stats.complete_piece_drop(2), 600);
        assert_eq!(stats.score(), before + 600);

        let mut stats = stats_at_lines(20);
        assert_eq!(stats.complete_piece_drop(4), 3000);
    }

    #[test]
    fn test_points_use_level_before_clear() {
        // 9 lines: level 1. Clearing 4 more crosses into level 2, but the
        // clear itself still scores at level 1.
        let mut stats = stats_at_lines(9);
        assert_eq!(stats.complete_piece_drop(4), 1000);
        assert_eq!(stats.level(), 2);
    }

    #[test]
    fn test_oversized_clear_uses_four_line_rate() {
        let mut stats = GameStats::new();
        assert_eq!(stats.complete_piece_drop(7), 1000);
        assert_eq!(stats.total_cleared_lines(), 7);
        assert_eq!(stats.line_cleared_counter()[4], 1);
    }

    #[test]
    fn test_leveling_boundaries() {
        let stats = stats_at_lines(9);
        assert_eq!(stats.level(), 1);

        let stats = stats_at_lines(10);
        assert_eq!(stats.level(), 2);
        assert_interval(stats.fall_interval(), 0.45);

        let stats = stats_at_lines(100);
        assert_eq!(stats.level(), 11);
        assert_interval(stats.fall_interval(), 0.1);
    }

    #[test]
    fn test_fall_interval_is_monotonic_and_floored() {
        let mut previous = fall_interval_for_level(1);
        for level in 2..100 {
            let interval = fall_interval_for_level(level);
            assert!(interval <= previous, "level {level} got slower");
            assert!(interval >= MIN_FALL_INTERVAL);
            previous = interval;
        }
        assert_interval(fall_interval_for_level(usize::MAX), MIN_FALL_INTERVAL);
    }

    #[test]
    fn test_stats_serialization() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(2);

        let serialized = serde_json::to_string(&stats).unwrap();
        let deserialized: GameStats = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, stats);
    }
}
