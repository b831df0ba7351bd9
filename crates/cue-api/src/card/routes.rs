use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use cue_db::{
    models::Card,
    repositories::{card, deck},
};
use uuid::Uuid;
use validator::Validate;

use super::model::{CreateCardRequest, UpdateCardRequest};
use crate::{ApiState, auth::AuthUser, error::ApiError};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/decks/{deck_id}/cards", get(list_cards).post(create_card))
        .route("/cards/{card_id}", put(update_card).delete(delete_card))
}

async fn require_deck(state: &ApiState, deck_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
    deck::find_owned_deck(&state.pool, deck_id, user_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))
}

async fn create_card(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<Uuid>,
    Json(payload): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<Card>), ApiError> {
    payload.validate()?;
    require_deck(&state, deck_id, auth_user.user_id).await?;

    let created = card::create_card(
        &state.pool,
        deck_id,
        &payload.front,
        &payload.back,
        payload.tag.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_cards(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<Vec<Card>>, ApiError> {
    require_deck(&state, deck_id, auth_user.user_id).await?;
    Ok(Json(card::list_cards(&state.pool, deck_id).await?))
}

/// Edit the text of a card. Its schedule is left alone.
async fn update_card(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(card_id): Path<Uuid>,
    Json(payload): Json<UpdateCardRequest>,
) -> Result<Json<Card>, ApiError> {
    payload.validate()?;

    card::update_owned_card(
        &state.pool,
        card_id,
        auth_user.user_id,
        &payload.front,
        &payload.back,
    )
    .await?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))
}

async fn delete_card(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(card_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if card::delete_owned_card(&state.pool, card_id, auth_user.user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Card not found".to_string()))
    }
}
