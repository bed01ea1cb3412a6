use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use proctor_backend::{
    routes, services::lifecycle::ExamPolicy, utils::time::FixedClock, AppState,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

fn t0() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-04-02T08:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

async fn setup_app() -> (Router, FixedClock) {
    let clock = FixedClock::new(t0());
    let state = AppState::in_memory(ExamPolicy::default(), 7, Arc::new(clock.clone()));
    state
        .question_service
        .seed_default_questions()
        .await
        .expect("seed questions");
    (routes::api_router().with_state(state), clock)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, json)
}

async fn register_candidate(app: &Router, handle: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/candidates",
        Some(json!({
            "email": format!("{}@example.com", handle),
            "linkedin_profile_url": format!("https://www.linkedin.com/in/{}", handle),
            "github_profile_url": format!("https://github.com/{}", handle),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["candidate_id"].as_str().unwrap().to_string()
}

async fn start_attempt(app: &Router, candidate_id: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/attempts",
        Some(json!({ "candidate_id": candidate_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["attempt_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn exam_flow_end_to_end() {
    let (app, clock) = setup_app().await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exam_duration_sec"], 420);

    let (status, body) = send(&app, "GET", "/api/questions", None).await;
    assert_eq!(status, StatusCode::OK);
    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 7);
    let q1 = questions[0]["question_id"].as_str().unwrap().to_string();
    let q2 = questions[1]["question_id"].as_str().unwrap().to_string();

    let candidate_id = register_candidate(&app, "linus").await;
    let (status, body) = send(&app, "GET", &format!("/api/candidates/{}", candidate_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "linus@example.com");
    let attempt_id = start_attempt(&app, &candidate_id).await;

    clock.advance(Duration::seconds(30));
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/attempts/{}/answer", attempt_id),
        Some(json!({ "question_id": q1, "answer": "closures capture state" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question_id"], q1.as_str());

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/attempts/{}/answer", attempt_id),
        Some(json!({ "questionID": q1, "answers": "closures capture their environment" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    clock.advance(Duration::seconds(30));
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/attempts/{}/event", attempt_id),
        Some(json!({ "type": "window-blur" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "action": "warn", "violation_count": 1 }));

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/attempts?candidate_id={}", candidate_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attempt_id"], attempt_id.as_str());
    assert_eq!(body["status"], "running");
    assert_eq!(body["violation_count"], 1);
    assert_eq!(body["violations"][0]["type"], "window-blur");
    assert_eq!(body["answers"].as_array().unwrap().len(), 1);
    assert_eq!(body["answers"][0]["answer"], "closures capture their environment");

    clock.advance(Duration::seconds(60));
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/attempts/{}/submit", attempt_id),
        Some(json!({
            "answers": [
                { "question_id": q1, "answer": "final one" },
                { "question_id": q2, "answer": "final two" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["final_status"], "submitted");
    assert_eq!(body["duration_sec"], 120);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/attempts?candidate_id={}", candidate_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", &format!("/api/attempts/{}", attempt_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "submitted");
    assert_eq!(body["answers"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn second_violation_terminates_and_later_calls_conflict() {
    let (app, clock) = setup_app().await;
    let candidate_id = register_candidate(&app, "margaret").await;
    let attempt_id = start_attempt(&app, &candidate_id).await;
    let event_uri = format!("/api/attempts/{}/event", attempt_id);

    clock.advance(Duration::seconds(10));
    let (_, body) = send(&app, "POST", &event_uri, Some(json!({ "type": "devtools-open" }))).await;
    assert_eq!(body["action"], "warn");

    clock.advance(Duration::seconds(10));
    let (_, body) = send(&app, "POST", &event_uri, Some(json!({ "type": "fullscreen-exit" }))).await;
    assert_eq!(body, json!({ "action": "terminate", "violation_count": 2 }));

    clock.advance(Duration::seconds(10));
    for _ in 0..2 {
        let (status, body) =
            send(&app, "POST", &event_uri, Some(json!({ "type": "paste-attempt" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "action": "terminated", "violation_count": 2 }));
    }

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/attempts/{}/submit", attempt_id),
        Some(json!({ "is_auto_submit": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "conflict");

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/attempts/{}/answer", attempt_id),
        Some(json!({ "question_id": "q1", "answer": "too late" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Terminated attempt no longer blocks a fresh start.
    start_attempt(&app, &candidate_id).await;
}

#[tokio::test]
async fn expiry_paths() {
    let (app, clock) = setup_app().await;
    let candidate_id = register_candidate(&app, "barbara").await;
    let attempt_id = start_attempt(&app, &candidate_id).await;

    clock.advance(Duration::minutes(7) + Duration::seconds(5));
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/attempts/{}/submit", attempt_id),
        Some(json!({ "answers": [], "is_auto_submit": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["final_status"], "auto_submitted");
    assert_eq!(body["duration_sec"], 425);

    let attempt_id = start_attempt(&app, &candidate_id).await;
    clock.advance(Duration::minutes(8));
    let (_, body) = send(
        &app,
        "POST",
        &format!("/api/attempts/{}/event", attempt_id),
        Some(json!({ "type": "window-focus-change" })),
    )
    .await;
    assert_eq!(body, json!({ "action": "terminate", "violation_count": 0 }));

    let attempt_id = start_attempt(&app, &candidate_id).await;
    clock.advance(Duration::minutes(10));
    let (_, body) = send(
        &app,
        "POST",
        &format!("/api/attempts/{}/submit", attempt_id),
        Some(json!({})),
    )
    .await;
    assert_eq!(body["final_status"], "terminated");
}

#[tokio::test]
async fn error_kinds_map_to_status_codes() {
    let (app, _clock) = setup_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/attempts",
        Some(json!({ "candidate_id": uuid::Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let candidate_id = register_candidate(&app, "edsger").await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/candidates",
        Some(json!({
            "email": "edsger@example.com",
            "linkedin_profile_url": "https://www.linkedin.com/in/someone-else",
            "github_profile_url": "https://github.com/someone-else",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Candidate already exists");

    let (status, _) = send(
        &app,
        "POST",
        "/api/candidates",
        Some(json!({
            "email": "not-an-email",
            "linkedin_profile_url": "https://www.linkedin.com/in/x",
            "github_profile_url": "https://github.com/x",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    start_attempt(&app, &candidate_id).await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/attempts",
        Some(json!({ "candidate_id": candidate_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/attempts/{}/event", uuid::Uuid::new_v4()),
        Some(json!({ "type": "window-blur" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/attempts/{}/event", uuid::Uuid::new_v4()),
        Some(json!({ "type": "screen-recording" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
