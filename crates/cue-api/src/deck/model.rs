use cue_db::models::{Card, Deck};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::card::model::CreateCardRequest;

/// Most cards accepted when a deck is created in one go
pub const MAX_CARDS_PER_REQUEST: u64 = 200;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDeckRequest {
    #[validate(
        length(min = 1, max = 200),
        custom(function = "crate::validation::not_blank")
    )]
    pub title: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 20000))]
    pub summary: Option<String>,
    /// Free-form tree rendered as a mind map by the client
    pub mind_map: Option<serde_json::Value>,
    #[serde(default)]
    #[validate(length(max = MAX_CARDS_PER_REQUEST), nested)]
    pub cards: Vec<CreateCardRequest>,
}

/// A deck together with its cards
#[derive(Debug, Serialize)]
pub struct DeckDetail {
    #[serde(flatten)]
    pub deck: Deck,
    pub cards: Vec<Card>,
}
