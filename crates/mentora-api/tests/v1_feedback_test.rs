use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use mentora::{MentoraApp, MentoraConfig};
use mentora_api::{AppState, build_app};
use serde_json::{Value, json};
use tower::util::ServiceExt;

fn create_test_app() -> (axum::Router, MentoraApp) {
    let mut config = MentoraConfig::default();
    config.mock.latency_ms = 0;
    let app = MentoraApp::builder("mentora-api-test")
        .config(config)
        .build()
        .unwrap();
    (build_app(AppState::new(app.clone()), false), app)
}

async fn post_feedback(app: &mut axum::Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/feedback")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, serde_json::from_slice(&body_bytes).unwrap())
}

#[tokio::test]
async fn test_submit_feedback() {
    let (mut router, app) = create_test_app();

    let (status, body) = post_feedback(
        &mut router,
        json!({ "userId": "student-1", "rating": 5, "comments": "  Loved the quizzes  " }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["rating"], 5);
    assert_eq!(body["comments"], "Loved the quizzes");
    assert_eq!(body["userId"], "student-1");
    assert!(body["id"].is_string());

    let stored = app.feedback().list().await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_anonymous_comment_only() {
    let (mut router, _) = create_test_app();

    let (status, body) =
        post_feedback(&mut router, json!({ "comments": "More history please" })).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["userId"].is_null());
    assert!(body["rating"].is_null());
}

#[tokio::test]
async fn test_invalid_feedback_rejected() {
    let (mut router, app) = create_test_app();

    let (status, _) = post_feedback(&mut router, json!({ "rating": 6 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_feedback(&mut router, json!({ "comments": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "feedback needs a rating or comments");

    assert!(app.feedback().list().await.unwrap().is_empty());
}
