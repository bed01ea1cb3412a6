use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let policy = state.attempt_service.policy();
    let body = json!({
        "status": "ok",
        "exam_duration_sec": policy.exam_duration.num_seconds(),
        "max_warnings_allowed": policy.max_warnings_allowed,
    });
    (StatusCode::OK, Json(body))
}
