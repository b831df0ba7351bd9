use axum::http::StatusCode;
use chrono::{Duration, Utc};
use cue_api::auth::jwt::Claims;
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::common::{self, JWT_SECRET, TestClient, TestStateBuilder};

fn client() -> TestClient {
    TestClient::new(common::app(TestStateBuilder::new().build_lazy()))
}

#[tokio::test]
async fn test_health_sets_request_id_and_security_headers() {
    let response = client().get("/health").await;

    response.assert_status(StatusCode::OK);
    assert!(response.headers.contains_key("x-request-id"));
    assert_eq!(response.headers["x-content-type-options"], "nosniff");
    assert_eq!(response.headers["x-frame-options"], "DENY");
    assert_eq!(response.headers["cache-control"], "no-store");
}

#[tokio::test]
async fn test_ready_reports_unreachable_database() {
    let app = common::app(TestStateBuilder::new().unreachable_database().build_lazy());
    let response = TestClient::new(app).get("/health/ready").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["status"], "unavailable");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let response = client().get("/nope").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_metrics_not_mounted_without_recorder() {
    client().get("/metrics").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let response = client().get("/decks").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], "Not authenticated");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    client()
        .get_with_auth("/decks", "not.a.jwt")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let now = Utc::now();
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        email: "late@example.com".to_string(),
        name: None,
        iat: (now - Duration::hours(3)).timestamp() as usize,
        exp: (now - Duration::hours(2)).timestamp() as usize,
    };
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();

    client()
        .get_with_auth("/me/stats", &token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let token = cue_api::auth::jwt::generate_jwt_token(
        Uuid::new_v4(),
        "x@example.com".to_string(),
        "a_completely_different_secret_of_32_chars",
        1,
    )
    .unwrap();

    client()
        .get_with_auth("/decks", &token)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_blank_deck_title_is_rejected_before_storage() {
    let (_, token) = common::test_user();

    let response = client()
        .post_json_with_auth("/decks", &json!({ "title": "   " }), &token)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_direct_review_quality_out_of_range() {
    let (_, token) = common::test_user();
    let uri = format!("/cards/{}/review", Uuid::new_v4());

    for quality in [-1, 6, 42] {
        client()
            .post_json_with_auth(&uri, &json!({ "quality": quality }), &token)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_unknown_study_session_is_404() {
    let (_, token) = common::test_user();
    let client = client();
    let id = Uuid::new_v4();

    client
        .get_with_auth(&format!("/study/{id}"), &token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    client
        .post_json_with_auth(&format!("/study/{id}/rate"), &json!({ "quality": 3 }), &token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    client
        .delete_with_auth(&format!("/study/{id}"), &token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rate_requires_quality_or_rating() {
    let (_, token) = common::test_user();
    let uri = format!("/study/{}/rate", Uuid::new_v4());

    client()
        .post_json_with_auth(&uri, &json!({}), &token)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    client()
        .post_json_with_auth(&uri, &json!({ "quality": 9 }), &token)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/decks")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "authorization,content-type")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = client().request(request).await;

    assert!(response.status.is_success());
    assert_eq!(
        response.headers["access-control-allow-origin"],
        "http://localhost:5173"
    );
}
