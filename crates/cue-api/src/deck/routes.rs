use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use cue_db::{
    models::DeckOverview,
    repositories::{card, deck, user},
};
use uuid::Uuid;
use validator::Validate;

use super::model::{CreateDeckRequest, DeckDetail};
use crate::{ApiState, auth::AuthUser, error::ApiError};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/decks", get(list_decks).post(create_deck))
        .route("/decks/{deck_id}", get(get_deck).delete(delete_deck))
}

/// Create a deck, optionally with its first cards, in one transaction
async fn create_deck(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<CreateDeckRequest>,
) -> Result<(StatusCode, Json<DeckDetail>), ApiError> {
    payload.validate()?;

    let mut tx = state.pool.begin().await?;

    user::ensure_user(
        &mut *tx,
        auth_user.user_id,
        &auth_user.email,
        auth_user.name.as_deref(),
    )
    .await?;

    let created = deck::create_deck(
        &mut *tx,
        auth_user.user_id,
        payload.title.trim(),
        payload.description.as_deref(),
        payload.summary.as_deref(),
        payload.mind_map.as_ref(),
    )
    .await?;

    let mut cards = Vec::with_capacity(payload.cards.len());
    for new_card in &payload.cards {
        cards.push(
            card::create_card(
                &mut *tx,
                created.id,
                &new_card.front,
                &new_card.back,
                new_card.tag.as_deref(),
            )
            .await?,
        );
    }

    tx.commit().await?;

    tracing::info!(deck_id = %created.id, cards = cards.len(), "deck created");

    Ok((
        StatusCode::CREATED,
        Json(DeckDetail {
            deck: created,
            cards,
        }),
    ))
}

async fn list_decks(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<Vec<DeckOverview>>, ApiError> {
    let decks = deck::list_decks(&state.pool, auth_user.user_id).await?;
    Ok(Json(decks))
}

async fn get_deck(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<Uuid>,
) -> Result<Json<DeckDetail>, ApiError> {
    let found = deck::find_owned_deck(&state.pool, deck_id, auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;

    let cards = card::list_cards(&state.pool, deck_id).await?;

    Ok(Json(DeckDetail { deck: found, cards }))
}

async fn delete_deck(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(deck_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if deck::delete_owned_deck(&state.pool, deck_id, auth_user.user_id).await? {
        tracing::info!(%deck_id, "deck deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Deck not found".to_string()))
    }
}
