use std::future::Future;

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use cue_db::{
    models::UserStats,
    repositories::{card, user},
};
use cue_srs::{Schedule, SchedulingState};
use sqlx::PgPool;
use uuid::Uuid;

use super::service::advance_progress;

/// Persistence boundary of the review pipeline.
///
/// Futures are `Send` so a rating can be persisted on a spawned task while
/// the study session moves on.
pub trait ReviewStore: Send + Sync + 'static {
    /// Current scheduling state of a card.
    fn load_schedule(
        &self,
        card_id: Uuid,
    ) -> impl Future<Output = anyhow::Result<SchedulingState>> + Send;

    /// Overwrite the scheduling fields of a card. Must be safe to retry.
    fn save_schedule(
        &self,
        card_id: Uuid,
        schedule: Schedule,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Award the experience and streak for one review done at `reviewed_at`.
    fn record_progress(
        &self,
        user_id: Uuid,
        reviewed_at: DateTime<Utc>,
    ) -> impl Future<Output = anyhow::Result<UserStats>> + Send;
}

/// [`ReviewStore`] backed by the `cards` and `users` tables.
#[derive(Debug, Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ReviewStore for PgReviewStore {
    async fn load_schedule(&self, card_id: Uuid) -> anyhow::Result<SchedulingState> {
        let schedule = card::get_schedule(&self.pool, card_id)
            .await
            .context("failed to read card schedule")?
            .ok_or_else(|| anyhow!("card {card_id} no longer exists"))?;

        Ok(SchedulingState {
            interval: schedule.interval_days,
            ease_factor: schedule.ease_factor,
        })
    }

    async fn save_schedule(&self, card_id: Uuid, schedule: Schedule) -> anyhow::Result<()> {
        let updated = card::update_schedule(
            &self.pool,
            card_id,
            schedule.interval,
            schedule.ease_factor,
            schedule.next_review_date,
        )
        .await
        .context("failed to write card schedule")?;

        if !updated {
            return Err(anyhow!("card {card_id} no longer exists"));
        }
        Ok(())
    }

    async fn record_progress(
        &self,
        user_id: Uuid,
        reviewed_at: DateTime<Utc>,
    ) -> anyhow::Result<UserStats> {
        // Row lock so two reviews landing together cannot both read the old streak
        let mut tx = self.pool.begin().await?;

        let stats = user::find_stats_for_update(&mut *tx, user_id)
            .await?
            .ok_or_else(|| anyhow!("user {user_id} not found"))?;

        let next = advance_progress(&stats, reviewed_at);

        user::update_progress(
            &mut *tx,
            user_id,
            next.xp,
            next.streak,
            reviewed_at,
        )
        .await?;

        tx.commit().await?;

        Ok(next)
    }
}
