use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};

/// Ease factor given to a card that has never been reviewed (2.50).
pub const DEFAULT_EASE_FACTOR: i32 = 250;

/// Floor applied to the ease factor after every computation (1.30).
pub const MIN_EASE_FACTOR: i32 = 130;

/// Lowest quality rating that counts as a successful recall.
pub const PASSING_QUALITY: i32 = 3;

/// Highest quality rating (perfect recall).
pub const MAX_QUALITY: i32 = 5;

/// The scheduling fields stored on a card.
///
/// The ease factor is kept as an integer scaled by 100 so it can be persisted
/// without floating point: `250` means an ease of 2.50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingState {
    /// Days until the next review, `0` if the card was never reviewed
    pub interval: i32,
    /// Interval multiplier scaled by 100
    pub ease_factor: i32,
}

impl Default for SchedulingState {
    fn default() -> Self {
        Self {
            interval: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
        }
    }
}

/// Output of the scheduler for a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Days until the next review, always at least 1
    pub interval: i32,
    /// Updated ease factor scaled by 100, never below [`MIN_EASE_FACTOR`]
    pub ease_factor: i32,
    /// When the card is next due
    pub next_review_date: DateTime<Utc>,
}

impl Schedule {
    /// The scheduling state to feed into the next review.
    pub const fn state(&self) -> SchedulingState {
        SchedulingState {
            interval: self.interval,
            ease_factor: self.ease_factor,
        }
    }
}

/// Compute the next schedule for a card, using the system clock for "now".
///
/// See [`compute_next_schedule_at`] for the algorithm.
pub fn compute_next_schedule(
    current_interval: i32,
    current_ease_factor: i32,
    quality: i32,
) -> Schedule {
    compute_next_schedule_at(current_interval, current_ease_factor, quality, Utc::now())
}

/// Compute the next schedule for a card after a review.
///
/// SM-2 derived. The function is pure: the same inputs always produce the same
/// interval and ease factor, and the due date is `now` plus the new interval in
/// calendar days.
///
/// # Arguments
///
/// * `current_interval` - Days of the current interval (`0` for a new card)
/// * `current_ease_factor` - Current ease factor scaled by 100 (`250` for a new card)
/// * `quality` - Recall quality from 0 (blackout) to 5 (perfect)
/// * `now` - The instant the review happened
///
/// # Algorithm
///
/// * Quality below 3: the interval restarts at 1 day and the ease factor is
///   left as is, so a single lapse is not punished twice.
/// * Quality 3 or more: the first success gives 1 day, the second gives 6 days,
///   later ones multiply the interval by the ease factor (rounded). The ease
///   factor then moves by `100 * (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))`,
///   i.e. +10 for a 5, 0 for a 4 and -14 for a 3.
/// * The ease factor never drops below [`MIN_EASE_FACTOR`]. There is no cap.
///
/// # Preconditions
///
/// `quality` must be within `0..=5`. This is checked in debug builds only;
/// release builds run the formula on whatever they are given.
pub fn compute_next_schedule_at(
    current_interval: i32,
    current_ease_factor: i32,
    quality: i32,
    now: DateTime<Utc>,
) -> Schedule {
    debug_assert!(
        (0..=MAX_QUALITY).contains(&quality),
        "quality must be within 0..=5, got {quality}"
    );

    let (interval, ease_factor) = if quality < PASSING_QUALITY {
        (1, current_ease_factor)
    } else {
        let interval = match current_interval {
            0 => 1,
            1 => 6,
            n => grow_interval(n, current_ease_factor),
        };
        (interval, current_ease_factor + ease_delta(quality))
    };

    let ease_factor = ease_factor.max(MIN_EASE_FACTOR);

    Schedule {
        interval,
        ease_factor,
        next_review_date: add_days(now, interval),
    }
}

/// `round(interval * ease_factor / 100)` in integer arithmetic, half rounding up.
fn grow_interval(interval: i32, ease_factor: i32) -> i32 {
    let scaled = (i64::from(interval) * i64::from(ease_factor) + 50).div_euclid(100);
    i32::try_from(scaled).unwrap_or(i32::MAX).max(1)
}

/// SM-2 ease adjustment already multiplied by 100.
///
/// `100 * (0.1 - l * (0.08 + l * 0.02))` with `l = 5 - q` is exactly
/// `10 - l * (8 + 2l)` for integer `q`, so no rounding is needed.
const fn ease_delta(quality: i32) -> i32 {
    let lapse = MAX_QUALITY - quality;
    10 - lapse * (8 + lapse * 2)
}

fn add_days(now: DateTime<Utc>, days: i32) -> DateTime<Utc> {
    let days = u64::try_from(days).unwrap_or(0);
    now.checked_add_days(Days::new(days))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
