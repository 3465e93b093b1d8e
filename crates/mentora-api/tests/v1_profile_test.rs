use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use mentora::{MentoraApp, MentoraConfig};
use mentora_api::{AppState, build_app};
use serde_json::{Value, json};
use tower::util::ServiceExt;

/// Create a test application on the mock backend without latency
fn create_test_app() -> axum::Router {
    let mut config = MentoraConfig::default();
    config.mock.latency_ms = 0;
    let app = MentoraApp::builder("mentora-api-test")
        .config(config)
        .build()
        .unwrap();
    build_app(AppState::new(app), false)
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

async fn create(app: &mut axum::Router, body: Value) -> Value {
    let (status, body) = json_request(app, "POST", "/api/v1/profiles", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn test_health_reports_mock_backend() {
    let mut app = create_test_app();

    let (status, body) = json_request(&mut app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "mentora-api");
    assert_eq!(body["backend"], "mock");
}

#[tokio::test]
async fn test_create_student_profile_with_defaults() {
    let mut app = create_test_app();

    let body = create(
        &mut app,
        json!({ "id": "student-1", "email": "sam@example.com", "name": "Sam" }),
    )
    .await;

    assert_eq!(body["id"], "student-1");
    assert_eq!(body["role"], "student");
    assert_eq!(body["classLevel"], "6");
    assert_eq!(body["level"], 1);
    assert_eq!(body["points"], 0);
    assert_eq!(body["completedTopics"].as_array().unwrap().len(), 0);

    let (status, fetched) = json_request(&mut app, "GET", "/api/v1/profiles/student-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn test_create_profile_derives_id_from_email() {
    let mut app = create_test_app();

    let body = create(
        &mut app,
        json!({ "email": "Kim@Example.com", "name": "Kim", "role": "teacher" }),
    )
    .await;

    assert!(body["id"].as_str().unwrap().starts_with("mock-"));
    assert_eq!(body["role"], "teacher");
    assert!(body["classLevel"].is_null());
    assert!(body["points"].is_null());
}

#[tokio::test]
async fn test_duplicate_profile_conflicts() {
    let mut app = create_test_app();
    let request = json!({ "id": "dup", "email": "dup@example.com", "name": "Dup" });

    create(&mut app, request.clone()).await;
    let (status, body) = json_request(&mut app, "POST", "/api/v1/profiles", Some(request)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Profile already exists");
}

#[tokio::test]
async fn test_invalid_role_and_class_level_rejected() {
    let mut app = create_test_app();

    let (status, body) = json_request(
        &mut app,
        "POST",
        "/api/v1/profiles",
        Some(json!({ "email": "x@example.com", "name": "X", "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown role: admin");

    let (status, _) = json_request(
        &mut app,
        "POST",
        "/api/v1/profiles",
        Some(json!({ "email": "y@example.com", "name": "Y", "classLevel": "13" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_missing_profile() {
    let mut app = create_test_app();

    let (status, body) = json_request(&mut app, "GET", "/api/v1/profiles/nobody", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Profile not found");
}

#[tokio::test]
async fn test_update_profile_settings() {
    let mut app = create_test_app();
    create(
        &mut app,
        json!({ "id": "student-2", "email": "lee@example.com", "name": "Lee" }),
    )
    .await;

    let (status, body) = json_request(
        &mut app,
        "PATCH",
        "/api/v1/profiles/student-2",
        Some(json!({ "name": "Lee Park", "classLevel": "8" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Lee Park");
    assert_eq!(body["classLevel"], "8");
    assert_eq!(body["email"], "lee@example.com");

    let (status, _) = json_request(
        &mut app,
        "PATCH",
        "/api/v1/profiles/missing",
        Some(json!({ "name": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_progress_merges_sets() {
    let mut app = create_test_app();
    create(
        &mut app,
        json!({ "id": "student-3", "email": "ada@example.com", "name": "Ada" }),
    )
    .await;

    json_request(
        &mut app,
        "PUT",
        "/api/v1/profiles/student-3/progress",
        Some(json!({ "points": 40, "completedTopics": ["fractions"], "badges": ["starter"] })),
    )
    .await;
    let (status, body) = json_request(
        &mut app,
        "PUT",
        "/api/v1/profiles/student-3/progress",
        Some(json!({ "points": 90, "completedTopics": ["fractions", "decimals"] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points"], 90);
    assert_eq!(body["completedTopics"].as_array().unwrap().len(), 2);
    assert_eq!(body["badges"], json!(["starter"]));
    assert!(body["lastActivity"].is_string());
}

#[tokio::test]
async fn test_progress_for_teacher_is_rejected() {
    let mut app = create_test_app();
    create(
        &mut app,
        json!({ "id": "teacher-1", "email": "t@example.com", "name": "T", "role": "teacher" }),
    )
    .await;

    let (status, _) = json_request(
        &mut app,
        "PUT",
        "/api/v1/profiles/teacher-1/progress",
        Some(json!({ "points": 10 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_teacher_lists_students() {
    let mut app = create_test_app();
    for (id, name) in [("s-a", "Ana"), ("s-b", "Ben")] {
        create(
            &mut app,
            json!({ "id": id, "email": format!("{id}@example.com"), "name": name }),
        )
        .await;
    }
    create(
        &mut app,
        json!({ "id": "teacher-2", "email": "t2@example.com", "name": "T2", "role": "teacher" }),
    )
    .await;
    json_request(
        &mut app,
        "PATCH",
        "/api/v1/profiles/teacher-2",
        Some(json!({ "studentIds": ["s-b", "ghost", "s-a"] })),
    )
    .await;

    let (status, body) =
        json_request(&mut app, "GET", "/api/v1/profiles/teacher-2/students", None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ben", "Ana"]);

    let (status, body) =
        json_request(&mut app, "GET", "/api/v1/profiles/teacher-2/children", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
