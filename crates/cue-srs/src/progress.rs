use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Experience points awarded for every persisted review.
pub const XP_PER_REVIEW: i32 = 10;

/// Compute the daily streak after studying on `today`.
///
/// Days are compared as calendar dates, not as 24 hour spans.
///
/// # Arguments
///
/// * `current_streak` - The streak stored before this review
/// * `last_study_date` - The day of the previous review, if any
/// * `today` - The day of this review
///
/// # Returns
///
/// * `1` on the very first study day
/// * `current_streak` when the user already studied today (no double count)
/// * `current_streak + 1` when the last study day was yesterday
/// * `1` when one or more days were skipped
pub fn next_streak(current_streak: i32, last_study_date: Option<NaiveDate>, today: NaiveDate) -> i32 {
    let Some(last) = last_study_date else {
        return 1;
    };

    if last == today {
        current_streak
    } else if today.pred_opt() == Some(last) {
        current_streak.saturating_add(1)
    } else {
        1
    }
}

/// Level information derived from a user's experience points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Current level, starting at 1
    pub level: i32,
    /// Experience at which the current level started
    pub current_level_xp: i32,
    /// Experience needed to reach the next level
    pub next_level_xp: i32,
    /// Progress through the current level, from 0 to 100
    pub progress_percent: f64,
}

/// Derive the level from experience points.
///
/// Levels grow quadratically: level `n` spans `[(n-1)^2 * 100, n^2 * 100)`,
/// so level 2 starts at 100 XP, level 3 at 400 XP, level 4 at 900 XP.
pub fn level_for_xp(xp: i32) -> Level {
    let xp = xp.max(0);
    let level = (xp / 100).isqrt() + 1;
    let current_level_xp = (level - 1) * (level - 1) * 100;
    let next_level_xp = level * level * 100;
    let progress_percent = f64::from(xp - current_level_xp) * 100.0
        / f64::from(next_level_xp - current_level_xp);

    Level {
        level,
        current_level_xp,
        next_level_xp,
        progress_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_study_day_starts_streak() {
        assert_eq!(next_streak(0, None, day(2025, 5, 1)), 1);
        // A stale stored streak without a date is still a first day
        assert_eq!(next_streak(7, None, day(2025, 5, 1)), 1);
    }

    #[test]
    fn test_same_day_does_not_double_count() {
        assert_eq!(next_streak(4, Some(day(2025, 5, 1)), day(2025, 5, 1)), 4);
    }

    #[test]
    fn test_consecutive_day_increments() {
        assert_eq!(next_streak(4, Some(day(2025, 5, 1)), day(2025, 5, 2)), 5);
        // Across a month boundary
        assert_eq!(next_streak(9, Some(day(2025, 4, 30)), day(2025, 5, 1)), 10);
        // Across a year boundary
        assert_eq!(next_streak(2, Some(day(2024, 12, 31)), day(2025, 1, 1)), 3);
    }

    #[test]
    fn test_skipped_day_resets() {
        assert_eq!(next_streak(12, Some(day(2025, 5, 1)), day(2025, 5, 3)), 1);
        assert_eq!(next_streak(12, Some(day(2024, 5, 1)), day(2025, 5, 1)), 1);
    }

    #[test]
    fn test_last_study_in_future_resets() {
        assert_eq!(next_streak(3, Some(day(2025, 5, 9)), day(2025, 5, 1)), 1);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_for_xp(0).level, 1);
        assert_eq!(level_for_xp(99).level, 1);
        assert_eq!(level_for_xp(100).level, 2);
        assert_eq!(level_for_xp(399).level, 2);
        assert_eq!(level_for_xp(400).level, 3);
        assert_eq!(level_for_xp(900).level, 4);
    }

    #[test]
    fn test_level_progress() {
        let level = level_for_xp(250);
        assert_eq!(level.level, 2);
        assert_eq!(level.current_level_xp, 100);
        assert_eq!(level.next_level_xp, 400);
        assert!((level.progress_percent - 50.0).abs() < f64::EPSILON);

        let level = level_for_xp(0);
        assert_eq!(level.progress_percent, 0.0);
    }

    #[test]
    fn test_negative_xp_is_treated_as_zero() {
        assert_eq!(level_for_xp(-50), level_for_xp(0));
    }
}
