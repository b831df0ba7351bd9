//! Background maintenance tasks.
//!
//! Study sessions live in memory and are normally ended by the client. Tabs
//! get closed without that happening, so idle sessions are swept here.

use std::time::Duration;

use tokio::{task::JoinHandle, time::interval};

use crate::{metrics, review::ReviewStore, study::SessionRegistry};

const SESSION_SWEEP_PERIOD: Duration = Duration::from_secs(300);

/// Start all background jobs
///
/// Returns the join handles so the caller can abort them on shutdown
pub fn start_background_jobs<S: ReviewStore>(
    sessions: SessionRegistry<S>,
    session_idle_minutes: i64,
) -> Vec<JoinHandle<()>> {
    vec![tokio::spawn(idle_session_sweep_job(
        sessions,
        chrono::Duration::minutes(session_idle_minutes),
        SESSION_SWEEP_PERIOD,
    ))]
}

async fn idle_session_sweep_job<S: ReviewStore>(
    sessions: SessionRegistry<S>,
    max_idle: chrono::Duration,
    period: Duration,
) {
    let mut ticker = interval(period);
    // The first tick completes immediately; nothing can be idle yet
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let removed = sessions.sweep_idle(max_idle);
        if removed > 0 {
            metrics::record_sessions_expired(removed);
            tracing::info!(removed, remaining = sessions.len(), "expired idle study sessions");
        } else {
            tracing::debug!(active = sessions.len(), "no idle study sessions");
        }
    }
}
