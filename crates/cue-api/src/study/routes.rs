use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use cue_db::repositories::{deck, study};
use uuid::Uuid;
use validator::Validate;

use super::{
    model::{
        RateRequest, RateResponse, SessionResponse, StudyQuery, StudyScope, VoiceAnswerRequest,
    },
    session::{ReviewSession, SessionCard},
};
use crate::{ApiState, auth::AuthUser, error::ApiError, review::PgReviewStore};

/// Upper bound on cards loaded into one session
pub const MAX_SESSION_CARDS: i64 = 500;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/decks/{deck_id}/study", post(start_session))
        .route("/study/{session_id}", get(get_session).delete(end_session))
        .route("/study/{session_id}/rate", post(rate_card))
        .route("/study/{session_id}/voice", post(voice_answer))
        .route("/study/{session_id}/restart", post(restart_session))
}

fn session_not_found() -> ApiError {
    ApiError::NotFound("Study session not found".to_string())
}

fn snapshot(
    session_id: Uuid,
    deck_id: Uuid,
    session: &mut ReviewSession<PgReviewStore>,
) -> SessionResponse {
    SessionResponse {
        session_id,
        deck_id,
        status: session.status(),
        outcomes: session.outcomes().clone(),
        summary: session.summary(),
        warnings: session.take_warnings(),
    }
}

async fn start_session(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<Uuid>,
    Query(query): Query<StudyQuery>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    deck::find_owned_deck(&state.pool, deck_id, auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;

    let cards = match query.scope {
        StudyScope::Due => study::get_due_cards(&state.pool, deck_id, MAX_SESSION_CARDS).await?,
        StudyScope::All => study::get_all_cards(&state.pool, deck_id, MAX_SESSION_CARDS).await?,
    };

    let mut session = ReviewSession::new(
        auth_user.user_id,
        Arc::clone(&state.review_store),
        state.retry_policy,
    );
    session.start(cards.into_iter().map(SessionCard::from).collect())?;

    let session_id = state.sessions.insert(auth_user.user_id, deck_id, session);
    tracing::info!(%session_id, %deck_id, scope = ?query.scope, "study session created");

    let response = state
        .sessions
        .with_session(session_id, auth_user.user_id, |s, deck_id| {
            snapshot(session_id, deck_id, s)
        })
        .ok_or_else(session_not_found)?;

    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_session(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    state
        .sessions
        .with_session(session_id, auth_user.user_id, |s, deck_id| {
            snapshot(session_id, deck_id, s)
        })
        .map(Json)
        .ok_or_else(session_not_found)
}

fn rate_in_session(
    state: &ApiState,
    auth_user: &AuthUser,
    session_id: Uuid,
    quality: i32,
) -> Result<Json<RateResponse>, ApiError> {
    let rated = state
        .sessions
        .with_session(session_id, auth_user.user_id, |s, _| s.rate(quality))
        .ok_or_else(session_not_found)??;

    Ok(Json(RateResponse {
        card_id: rated.card_id,
        quality: rated.quality,
        status: rated.status,
    }))
}

async fn rate_card(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<RateRequest>,
) -> Result<Json<RateResponse>, ApiError> {
    payload.validate()?;
    let quality = payload.resolve_quality()?;
    rate_in_session(&state, &auth_user, session_id, quality)
}

async fn voice_answer(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<VoiceAnswerRequest>,
) -> Result<Json<RateResponse>, ApiError> {
    payload.validate()?;
    let quality = payload.resolve_quality()?;
    rate_in_session(&state, &auth_user, session_id, quality)
}

async fn restart_session(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    state
        .sessions
        .with_session(
            session_id,
            auth_user.user_id,
            |s, deck_id| -> Result<SessionResponse, ApiError> {
                s.restart()?;
                Ok(snapshot(session_id, deck_id, s))
            },
        )
        .ok_or_else(session_not_found)?
        .map(Json)
}

async fn end_session(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut session = state
        .sessions
        .remove(session_id, auth_user.user_id)
        .ok_or_else(session_not_found)?;
    session.reset();

    Ok(StatusCode::NO_CONTENT)
}
