//! Review sessions: walking a learner through a deck one card at a time.

pub mod model;
pub mod registry;
pub mod routes;
pub mod session;

pub use registry::SessionRegistry;
pub use routes::routes;
pub use session::{
    RatedCard, ReviewSession, ReviewWarning, SessionCard, SessionError, SessionState,
    SessionStatus, SessionSummary, WarningKind,
};
