use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::{
    card, deck,
    middleware::{cors::create_cors_layer, request_id, security_headers::apply_security_headers},
    review,
    state::ApiState,
    study, user,
};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .merge(deck::routes())
        .merge(card::routes())
        .merge(review::routes())
        .merge(study::routes())
        .merge(user::routes())
        .fallback(handler_404)
}

/// The full application: routes, `/metrics` when a recorder is installed,
/// and the middleware stack.
pub fn app(
    state: ApiState,
    metrics_handle: Option<PrometheusHandle>,
    allowed_origins: Vec<String>,
) -> Router {
    let environment = state.environment;

    let mut routes = router();
    if let Some(handle) = metrics_handle {
        let metrics_app = Router::new()
            .route("/metrics", get(crate::metrics::metrics_handler))
            .with_state(handle);
        routes = routes.merge(metrics_app);
    }

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Outermost last: request ids are assigned before tracing and metrics run
    let app = routes
        .with_state(state)
        .layer(create_cors_layer(allowed_origins))
        .layer(trace_layer)
        .layer(middleware::from_fn(crate::metrics::track_metrics))
        .layer(middleware::from_fn(request_id::request_id_middleware));

    apply_security_headers(app, environment)
}

/// Liveness: the process is up
async fn health() -> StatusCode {
    StatusCode::OK
}

/// Readiness: the database answers
async fn ready(State(state): State<ApiState>) -> impl IntoResponse {
    match cue_db::ping(&state.pool).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "The requested resource was not found" })),
    )
}
