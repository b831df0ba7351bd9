use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use cue_db::models::UserStats;
use cue_srs::{Schedule, XP_PER_REVIEW, compute_next_schedule, next_streak};
use uuid::Uuid;

use super::store::ReviewStore;
use crate::metrics;

/// How often a failed schedule write is attempted before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Base delay; attempt `n` waits `n * backoff` before the next try
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    /// Wait before the try following failed attempt `attempt`, saturating on overflow.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff.checked_mul(attempt).unwrap_or(Duration::MAX)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(200),
        }
    }
}

/// What a persisted review produced.
#[derive(Debug)]
pub struct ReviewOutcome {
    pub schedule: Schedule,
    /// Updated counters, or why they could not be written. The schedule is
    /// already saved either way.
    pub progress: anyhow::Result<UserStats>,
}

/// Progress counters after one more review at `reviewed_at`.
pub fn advance_progress(stats: &UserStats, reviewed_at: DateTime<Utc>) -> UserStats {
    let streak = next_streak(
        stats.streak,
        stats.last_study_date.map(|d| d.date_naive()),
        reviewed_at.date_naive(),
    );

    UserStats {
        xp: stats.xp.saturating_add(XP_PER_REVIEW),
        streak,
        last_study_date: Some(reviewed_at),
    }
}

/// Schedule and save one rating, retrying the read-compute-write unit per `policy`.
async fn persist_schedule<S: ReviewStore>(
    store: &S,
    card_id: Uuid,
    quality: i32,
    policy: RetryPolicy,
) -> anyhow::Result<Schedule> {
    let mut attempt = 1;
    loop {
        let result = async {
            let state = store.load_schedule(card_id).await?;
            let schedule = compute_next_schedule(state.interval, state.ease_factor, quality);
            store.save_schedule(card_id, schedule).await?;
            anyhow::Ok(schedule)
        }
        .await;

        match result {
            Ok(schedule) => return Ok(schedule),
            Err(e) if attempt < policy.max_attempts => {
                tracing::warn!(%card_id, attempt, error = %e, "review write failed, retrying");
                tokio::time::sleep(policy.delay_after(attempt)).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e.context(format!("review not saved after {attempt} attempt(s)")));
            }
        }
    }
}

/// Apply a quality rating to a card.
///
/// Reads the card's scheduling state, runs the scheduler, writes the result
/// and then awards progress to `user_id`. Progress is only touched once the
/// schedule is saved; a failed progress update does not undo the schedule.
///
/// `source` labels the metrics (`"session"` or `"direct"`).
pub async fn apply_review<S: ReviewStore>(
    store: &S,
    user_id: Uuid,
    card_id: Uuid,
    quality: i32,
    policy: RetryPolicy,
    source: &'static str,
) -> anyhow::Result<ReviewOutcome> {
    let start = Instant::now();
    let result = persist_schedule(store, card_id, quality, policy).await;
    metrics::record_review_persisted(source, result.is_ok(), start.elapsed().as_secs_f64());
    let schedule = result?;

    tracing::debug!(
        %card_id,
        quality,
        interval = schedule.interval,
        ease_factor = schedule.ease_factor,
        "review scheduled"
    );

    let progress = store.record_progress(user_id, Utc::now()).await;
    if let Err(e) = &progress {
        tracing::warn!(%user_id, error = %e, "progress update failed");
    }

    Ok(ReviewOutcome { schedule, progress })
}
