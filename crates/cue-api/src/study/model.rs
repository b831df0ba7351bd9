use std::collections::HashMap;

use cue_srs::{Rating, quality_from_verdict, quality_from_voice_score};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::session::{ReviewWarning, SessionStatus, SessionSummary};
use crate::error::ApiError;

/// Which cards of a deck a session walks through
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyScope {
    /// Cards whose review date has passed (or that were never reviewed)
    #[default]
    Due,
    /// Every card in the deck, for cramming
    All,
}

#[derive(Debug, Default, Deserialize)]
pub struct StudyQuery {
    #[serde(default)]
    pub scope: StudyScope,
}

/// Self-rating of the current card. `quality` wins over `rating` when both are sent.
#[derive(Debug, Deserialize, Validate)]
pub struct RateRequest {
    #[validate(range(min = 0, max = 5))]
    pub quality: Option<i32>,
    pub rating: Option<Rating>,
}

impl RateRequest {
    pub fn resolve_quality(&self) -> Result<i32, ApiError> {
        self.quality
            .or(self.rating.map(Rating::quality))
            .ok_or_else(|| ApiError::Validation("either quality or rating is required".into()))
    }
}

/// Result of a spoken answer. `score` wins over `is_correct` when both are sent.
#[derive(Debug, Deserialize, Validate)]
pub struct VoiceAnswerRequest {
    /// Similarity between the spoken and the expected answer, 0 to 100
    #[validate(range(max = 100))]
    pub score: Option<u8>,
    pub is_correct: Option<bool>,
}

impl VoiceAnswerRequest {
    pub fn resolve_quality(&self) -> Result<i32, ApiError> {
        self.score
            .map(quality_from_voice_score)
            .or(self.is_correct.map(quality_from_verdict))
            .ok_or_else(|| ApiError::Validation("either score or is_correct is required".into()))
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub deck_id: Uuid,
    #[serde(flatten)]
    pub status: SessionStatus,
    pub outcomes: HashMap<Uuid, i32>,
    pub summary: SessionSummary,
    /// Persistence problems since the last time the session was read
    pub warnings: Vec<ReviewWarning>,
}

#[derive(Debug, Serialize)]
pub struct RateResponse {
    pub card_id: Uuid,
    pub quality: i32,
    #[serde(flatten)]
    pub status: SessionStatus,
}
