//! Applying a quality rating to a card: schedule, persist, then award progress.

pub mod routes;
pub mod service;
pub mod store;

pub use routes::routes;
pub use service::{ReviewOutcome, RetryPolicy, advance_progress, apply_review};
pub use store::{PgReviewStore, ReviewStore};
