use axum::{Json, Router, extract::State, routing::get};
use cue_db::{models::UserStats, repositories::user};

use super::model::StatsResponse;
use crate::{ApiState, auth::AuthUser, error::ApiError};

pub fn routes() -> Router<ApiState> {
    Router::new().route("/me/stats", get(get_stats))
}

/// A user who has not created anything yet has no row and starts from zero
async fn get_stats(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = user::find_stats(&state.pool, auth_user.user_id)
        .await?
        .unwrap_or(UserStats {
            xp: 0,
            streak: 0,
            last_study_date: None,
        });

    Ok(Json(stats.into()))
}
