use std::{collections::HashMap, fmt, sync::Arc};

use cue_srs::{MAX_QUALITY, PASSING_QUALITY};
use serde::Serialize;
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    metrics,
    review::{ReviewStore, RetryPolicy, apply_review},
};

/// A card as presented during study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionCard {
    pub id: Uuid,
    pub front: String,
    pub back: String,
}

impl From<cue_db::models::StudyCard> for SessionCard {
    fn from(card: cue_db::models::StudyCard) -> Self {
        Self {
            id: card.id,
            front: card.front,
            back: card.back,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Active,
    Complete,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("there is no card to rate, the session is not active")]
    NotActive,
    #[error("the session is already in progress")]
    AlreadyActive,
    #[error("the session has not been started")]
    NotStarted,
    #[error("quality must be between 0 and 5, got {0}")]
    InvalidQuality(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The card's new schedule could not be written; the rating is lost
    ScheduleNotSaved,
    /// The schedule was saved but xp and streak were not updated
    ProgressNotSaved,
}

/// Non-fatal persistence problem reported back to the learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewWarning {
    pub card_id: Uuid,
    pub kind: WarningKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub state: SessionState,
    /// Number of cards already rated in this pass
    pub cursor: usize,
    pub total: usize,
    pub current: Option<SessionCard>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub reviewed: usize,
    pub passed: usize,
    pub failed: usize,
}

/// Result of [`ReviewSession::rate`].
#[derive(Debug)]
pub struct RatedCard {
    pub card_id: Uuid,
    pub quality: i32,
    pub status: SessionStatus,
    /// Background write of the rating. Finishes on its own; awaiting it is optional.
    pub persistence: JoinHandle<()>,
}

/// Walks a learner through a sequence of cards.
///
/// Rating a card advances the session immediately; the rating is persisted by
/// a spawned task so the next card never waits on the database. Persistence
/// tasks are never cancelled, not even by [`reset`](Self::reset): a rating
/// that has been accepted is always written (or reported as a warning).
pub struct ReviewSession<S> {
    user_id: Uuid,
    store: Arc<S>,
    policy: RetryPolicy,
    cards: Vec<SessionCard>,
    cursor: usize,
    outcomes: HashMap<Uuid, i32>,
    state: SessionState,
    warnings_tx: mpsc::UnboundedSender<ReviewWarning>,
    warnings_rx: mpsc::UnboundedReceiver<ReviewWarning>,
}

impl<S> fmt::Debug for ReviewSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewSession")
            .field("user_id", &self.user_id)
            .field("state", &self.state)
            .field("cursor", &self.cursor)
            .field("total", &self.cards.len())
            .finish_non_exhaustive()
    }
}

impl<S: ReviewStore> ReviewSession<S> {
    pub fn new(user_id: Uuid, store: Arc<S>, policy: RetryPolicy) -> Self {
        let (warnings_tx, warnings_rx) = mpsc::unbounded_channel();
        Self {
            user_id,
            store,
            policy,
            cards: Vec::new(),
            cursor: 0,
            outcomes: HashMap::new(),
            state: SessionState::Idle,
            warnings_tx,
            warnings_rx,
        }
    }

    /// Begin a pass over `cards`. An empty sequence completes immediately.
    pub fn start(&mut self, cards: Vec<SessionCard>) -> Result<SessionState, SessionError> {
        if self.state == SessionState::Active {
            return Err(SessionError::AlreadyActive);
        }

        metrics::record_session_started(cards.len());

        self.cards = cards;
        self.cursor = 0;
        self.outcomes.clear();
        self.state = if self.cards.is_empty() {
            SessionState::Complete
        } else {
            SessionState::Active
        };

        tracing::debug!(user_id = %self.user_id, cards = self.cards.len(), "study session started");
        Ok(self.state)
    }

    /// Run the same card sequence again after finishing it.
    pub fn restart(&mut self) -> Result<SessionState, SessionError> {
        match self.state {
            SessionState::Complete => {
                let cards = std::mem::take(&mut self.cards);
                self.start(cards)
            }
            SessionState::Active => Err(SessionError::AlreadyActive),
            SessionState::Idle => Err(SessionError::NotStarted),
        }
    }

    /// Rate the current card and move on to the next one.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn rate(&mut self, quality: i32) -> Result<RatedCard, SessionError> {
        if !(0..=MAX_QUALITY).contains(&quality) {
            return Err(SessionError::InvalidQuality(quality));
        }
        if self.state != SessionState::Active {
            return Err(SessionError::NotActive);
        }
        let card_id = self
            .cards
            .get(self.cursor)
            .map(|card| card.id)
            .ok_or(SessionError::NotActive)?;

        self.outcomes.insert(card_id, quality);
        self.cursor += 1;
        if self.cursor >= self.cards.len() {
            self.state = SessionState::Complete;
            metrics::record_session_completed();
        }
        metrics::record_rating(quality);

        let span = tracing::info_span!("persist_review", user_id = %self.user_id, %card_id);
        let persistence = tokio::spawn(
            persist_rating(
                Arc::clone(&self.store),
                self.user_id,
                card_id,
                quality,
                self.policy,
                self.warnings_tx.clone(),
            )
            .instrument(span),
        );

        Ok(RatedCard {
            card_id,
            quality,
            status: self.status(),
            persistence,
        })
    }

    /// Drop the card sequence and go back to idle. In-flight writes still finish.
    pub fn reset(&mut self) {
        self.cards.clear();
        self.cursor = 0;
        self.outcomes.clear();
        self.state = SessionState::Idle;
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_card(&self) -> Option<&SessionCard> {
        match self.state {
            SessionState::Active => self.cards.get(self.cursor),
            SessionState::Idle | SessionState::Complete => None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: self.state,
            cursor: self.cursor,
            total: self.cards.len(),
            current: self.current_card().cloned(),
        }
    }

    /// Latest quality given to each card in the current pass
    pub const fn outcomes(&self) -> &HashMap<Uuid, i32> {
        &self.outcomes
    }

    pub fn summary(&self) -> SessionSummary {
        let passed = self
            .outcomes
            .values()
            .filter(|&&q| q >= PASSING_QUALITY)
            .count();

        SessionSummary {
            reviewed: self.outcomes.len(),
            passed,
            failed: self.outcomes.len() - passed,
        }
    }

    /// Warnings raised by finished persistence tasks since the last call.
    pub fn take_warnings(&mut self) -> Vec<ReviewWarning> {
        let mut warnings = Vec::new();
        while let Ok(warning) = self.warnings_rx.try_recv() {
            warnings.push(warning);
        }
        warnings
    }
}

async fn persist_rating<S: ReviewStore>(
    store: Arc<S>,
    user_id: Uuid,
    card_id: Uuid,
    quality: i32,
    policy: RetryPolicy,
    warnings: mpsc::UnboundedSender<ReviewWarning>,
) {
    let warning = match apply_review(store.as_ref(), user_id, card_id, quality, policy, "session").await
    {
        Ok(outcome) => match outcome.progress {
            Ok(_) => None,
            Err(e) => Some(ReviewWarning {
                card_id,
                kind: WarningKind::ProgressNotSaved,
                message: format!("Your review was saved but progress was not updated: {e}"),
            }),
        },
        Err(e) => {
            tracing::warn!(error = ?e, "review could not be saved");
            Some(ReviewWarning {
                card_id,
                kind: WarningKind::ScheduleNotSaved,
                message: format!("Your review could not be saved: {e:#}"),
            })
        }
    };

    if let Some(warning) = warning {
        // The session may already be gone; nobody is left to tell
        let _ = warnings.send(warning);
    }
}
