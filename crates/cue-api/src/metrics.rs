//! Prometheus metrics for HTTP traffic and the review pipeline.

use std::{sync::LazyLock, time::Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use regex::Regex;

static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .expect("static regex")
});

static NUMERIC_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+").expect("static regex"));

/// Install the Prometheus recorder and return the handle that renders `/metrics`.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )?
        .set_buckets_for_metric(
            Matcher::Full("review_persist_duration_seconds".to_string()),
            &[0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Middleware recording request count, latency and in-flight requests
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    gauge!("http_requests_in_flight").increment(1.0);
    let response = next.run(req).await;
    gauge!("http_requests_in_flight").decrement(1.0);

    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// Collapse ids in a path so every card or session does not get its own series
fn normalize_path(path: &str) -> String {
    let path = UUID_SEGMENT.replace_all(path, ":id");
    NUMERIC_SEGMENT.replace_all(&path, "/:id").into_owned()
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

/// Record the outcome of writing one review's schedule.
///
/// `source` is `"session"` for ratings made inside a study session and
/// `"direct"` for one-off reviews.
pub fn record_review_persisted(source: &'static str, success: bool, duration_secs: f64) {
    let status = if success { "success" } else { "failure" };

    counter!("reviews_persisted_total", "source" => source, "status" => status).increment(1);
    histogram!("review_persist_duration_seconds", "source" => source).record(duration_secs);
}

/// Record a quality rating given by a learner.
pub fn record_rating(quality: i32) {
    let outcome = if quality >= cue_srs::PASSING_QUALITY {
        "pass"
    } else {
        "fail"
    };
    counter!("ratings_total", "outcome" => outcome).increment(1);
}

pub fn record_session_started(cards: usize) {
    counter!("study_sessions_started_total").increment(1);
    histogram!("study_session_cards").record(cards as f64);
}

pub fn record_session_completed() {
    counter!("study_sessions_completed_total").increment(1);
}

pub fn record_sessions_expired(count: usize) {
    counter!("study_sessions_expired_total").increment(count as u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path("/decks/550e8400-e29b-41d4-a716-446655440000"),
            "/decks/:id"
        );
        assert_eq!(
            normalize_path("/study/550e8400-e29b-41d4-a716-446655440000/rate"),
            "/study/:id/rate"
        );
        assert_eq!(normalize_path("/cards/42/review"), "/cards/:id/review");
        assert_eq!(normalize_path("/health"), "/health");
    }
}
