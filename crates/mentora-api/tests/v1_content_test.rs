use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use mentora::{
    CoreError, GenerationOutput, GenerationRequest, GenerationResponse, Generator, MentoraApp,
    MentoraConfig,
};
use mentora_api::{AppState, build_app};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

/// Replies with a fixed output and records every request it sees
struct ScriptedGenerator {
    reply: Result<GenerationOutput, CoreError>,
    seen: Arc<Mutex<Vec<GenerationRequest>>>,
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, CoreError> {
        self.seen.lock().unwrap().push(request.clone());
        self.reply.clone().map(|output| GenerationResponse {
            request_id: request.id,
            output,
        })
    }
}

fn text(body: &str) -> Result<GenerationOutput, CoreError> {
    Ok(GenerationOutput::Text {
        text: body.to_string(),
    })
}

fn create_test_app(
    reply: Result<GenerationOutput, CoreError>,
) -> (axum::Router, Arc<Mutex<Vec<GenerationRequest>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut config = MentoraConfig::default();
    config.mock.latency_ms = 0;
    let app = MentoraApp::builder("mentora-api-test")
        .config(config)
        .generator(ScriptedGenerator {
            reply,
            seen: Arc::clone(&seen),
        })
        .build()
        .unwrap();
    (build_app(AppState::new(app), false), seen)
}

/// Helper function to make JSON requests
async fn json_request(
    app: &mut axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request_builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    let request = if let Some(body) = body {
        request_builder
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    } else {
        request_builder.body(Body::empty()).unwrap()
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body: Value = if body_bytes.is_empty() {
        json!(null)
    } else {
        serde_json::from_slice(&body_bytes)
            .unwrap_or_else(|_| json!(String::from_utf8_lossy(&body_bytes).to_string()))
    };

    (status, body)
}

#[tokio::test]
async fn test_lesson_carries_requested_topic_id() {
    let (mut app, seen) = create_test_app(text(
        r#"```json
{"title":"Fractions","introduction":"Parts of a whole","sections":[{"heading":"Halves","content":"Two equal parts"}],"keyPoints":["numerator","denominator"]}
```"#,
    ));

    let (status, body) = json_request(
        &mut app,
        "POST",
        "/api/v1/content/lesson",
        Some(json!({
            "topic": { "id": "math-fractions", "name": "Fractions" },
            "subject": "Math",
            "classLevel": "4"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["topicId"], "math-fractions");
    assert_eq!(body["title"], "Fractions");
    assert_eq!(body["sections"][0]["heading"], "Halves");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].response_schema.is_some());
}

#[tokio::test]
async fn test_quiz_rejects_out_of_range_answer() {
    let (mut app, _) = create_test_app(text(
        r#"[{"question":"1/2 + 1/2?","options":["1","2"],"correctAnswerIndex":5,"explanation":"","difficulty":"easy"}]"#,
    ));

    let (status, body) = json_request(
        &mut app,
        "POST",
        "/api/v1/content/quiz",
        Some(json!({ "topic": { "id": "f", "name": "Fractions" }, "count": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["error"],
        "The AI tutor sent an unexpected answer. Please try again."
    );
}

#[tokio::test]
async fn test_rate_limit_maps_to_429() {
    let (mut app, _) = create_test_app(Err(CoreError::Provider(
        "HTTP 429 [RESOURCE_EXHAUSTED]: quota exceeded".to_string(),
    )));

    let (status, body) = json_request(
        &mut app,
        "POST",
        "/api/v1/content/flashcards",
        Some(json!({ "topic": { "id": "cells", "name": "Cells" } })),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].as_str().unwrap().contains("busy"));
}

#[tokio::test]
async fn test_diagnostic_quiz_requires_topics() {
    let (mut app, seen) = create_test_app(text("[]"));

    let (status, _) = json_request(
        &mut app,
        "POST",
        "/api/v1/content/diagnostic",
        Some(json!({ "subject": "Math", "topics": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_diagnostic_quiz_rejects_unknown_topic_tags() {
    let (mut app, _) = create_test_app(text(
        r#"[{"topicId":"history","question":"Q","options":["a","b"],"correctAnswerIndex":0,"difficulty":"medium"}]"#,
    ));

    let (status, _) = json_request(
        &mut app,
        "POST",
        "/api/v1/content/diagnostic",
        Some(json!({
            "subject": "Math",
            "topics": [{ "id": "algebra", "name": "Algebra" }],
            "count": 1
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_diagnostic_analysis_updates_profile() {
    let (mut app, _) = create_test_app(text("{}"));
    let (status, _) = json_request(
        &mut app,
        "POST",
        "/api/v1/profiles",
        Some(json!({ "id": "diag-student", "email": "d@example.com", "name": "D" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = json_request(
        &mut app,
        "POST",
        "/api/v1/content/diagnostic/analysis",
        Some(json!({
            "userId": "diag-student",
            "answers": [
                { "topicId": "algebra", "correct": true },
                { "topicId": "geometry", "correct": false },
                { "topicId": "algebra", "correct": true }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["strengths"], json!(["algebra"]));
    assert_eq!(body["weaknesses"], json!(["geometry"]));
    assert_eq!(body["profile"]["weaknesses"], json!(["geometry"]));
}

#[tokio::test]
async fn test_diagnostic_analysis_without_user() {
    let (mut app, _) = create_test_app(text("{}"));

    let (status, body) = json_request(
        &mut app,
        "POST",
        "/api/v1/content/diagnostic/analysis",
        Some(json!({ "answers": [{ "topicId": "verbs", "correct": false }] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["weaknesses"], json!(["verbs"]));
    assert!(body["profile"].is_null());
}

#[tokio::test]
async fn test_image_is_base64_encoded() {
    let (mut app, seen) = create_test_app(Ok(GenerationOutput::Image {
        mime_type: "image/png".to_string(),
        data: vec![0x89, 0x50, 0x4e, 0x47],
    }));

    let (status, body) = json_request(
        &mut app,
        "POST",
        "/api/v1/content/image",
        Some(json!({ "description": "the water cycle" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mimeType"], "image/png");
    assert_eq!(body["data"], "iVBORw==");
    assert!(seen.lock().unwrap()[0].wants_image);
}

#[tokio::test]
async fn test_explanation_with_attachment() {
    let (mut app, seen) = create_test_app(text("Photosynthesis turns light into sugar."));

    let (status, body) = json_request(
        &mut app,
        "POST",
        "/api/v1/content/explanation",
        Some(json!({
            "question": "What is shown here?",
            "attachment": { "mimeType": "image/jpeg", "data": "aGVsbG8=" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["explanation"], "Photosynthesis turns light into sugar.");
    assert_eq!(seen.lock().unwrap()[0].parts.len(), 1);

    let (status, _) = json_request(
        &mut app,
        "POST",
        "/api/v1/content/explanation",
        Some(json!({
            "question": "And this?",
            "attachment": { "mimeType": "image/jpeg", "data": "not base64!" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_blank_input_is_rejected_before_generation() {
    let (mut app, seen) = create_test_app(text("{}"));

    let (status, body) = json_request(
        &mut app,
        "POST",
        "/api/v1/content/summary",
        Some(json!({ "text": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "text cannot be empty");
    assert!(seen.lock().unwrap().is_empty());
}
