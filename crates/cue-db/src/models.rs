use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gamification counters stored on the user row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserStats {
    /// Total experience points
    pub xp: i32,
    /// Consecutive study days
    pub streak: i32,
    /// Instant of the last persisted review
    pub last_study_date: Option<DateTime<Utc>>,
}

/// Deck model - a user's collection of cards
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Deck {
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Longer summary of the source material
    pub summary: Option<String>,
    /// Concept graph (`{nodes, edges}`) stored as-is
    pub mind_map: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Deck row as listed on the dashboard, with the number of cards due now
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeckOverview {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Cards never reviewed or whose due date has passed
    pub due_cards: i64,
    pub total_cards: i64,
}

/// Card model - a question/answer pair plus its scheduling state
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Card {
    pub id: Uuid,
    pub deck_id: Uuid,
    pub front: String,
    pub back: String,
    pub tag: Option<String>,
    pub next_review_date: Option<DateTime<Utc>>,
    pub interval_days: i32,
    pub ease_factor: i32,
    pub created_at: DateTime<Utc>,
}

/// Scheduling fields of a card, as read before and written after a review
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::FromRow)]
pub struct CardSchedule {
    pub interval_days: i32,
    pub ease_factor: i32,
    pub next_review_date: Option<DateTime<Utc>>,
}

/// The slice of a card a study session needs
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudyCard {
    pub id: Uuid,
    pub front: String,
    pub back: String,
}
