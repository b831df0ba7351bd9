use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use chrono::{DateTime, Utc};
use cue_db::repositories::card;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::service::apply_review;
use crate::{ApiState, auth::AuthUser, error::ApiError};

pub fn routes() -> Router<ApiState> {
    Router::new().route("/cards/{card_id}/review", post(review_card))
}

#[derive(Debug, Deserialize, Validate)]
struct ReviewRequest {
    #[validate(range(min = 0, max = 5))]
    quality: i32,
}

#[derive(Debug, Serialize)]
struct ReviewResponse {
    card_id: Uuid,
    interval: i32,
    ease_factor: i32,
    next_review_date: DateTime<Utc>,
    /// Absent when the schedule was saved but the progress update failed
    xp: Option<i32>,
    streak: Option<i32>,
}

/// Review one card outside of a study session. Waits for the write.
async fn review_card(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(card_id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    payload.validate()?;

    card::find_owned_card(&state.pool, card_id, auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    let outcome = apply_review(
        state.review_store.as_ref(),
        auth_user.user_id,
        card_id,
        payload.quality,
        state.retry_policy,
        "direct",
    )
    .await?;

    let progress = outcome.progress.ok();
    crate::metrics::record_rating(payload.quality);

    Ok(Json(ReviewResponse {
        card_id,
        interval: outcome.schedule.interval,
        ease_factor: outcome.schedule.ease_factor,
        next_review_date: outcome.schedule.next_review_date,
        xp: progress.as_ref().map(|p| p.xp),
        streak: progress.as_ref().map(|p| p.streak),
    }))
}
