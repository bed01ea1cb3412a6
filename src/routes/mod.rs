pub mod attempts;
pub mod candidates;
pub mod health;
pub mod questions;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/candidates", post(candidates::create_candidate))
        .route(
            "/api/candidates/:candidate_id",
            get(candidates::get_candidate),
        )
        .route("/api/questions", get(questions::list_questions))
        .route(
            "/api/attempts",
            post(attempts::create_attempt).get(attempts::get_running_attempt),
        )
        .route("/api/attempts/:attempt_id", get(attempts::get_attempt))
        .route(
            "/api/attempts/:attempt_id/event",
            post(attempts::register_event),
        )
        .route(
            "/api/attempts/:attempt_id/submit",
            post(attempts::submit_attempt),
        )
        .route(
            "/api/attempts/:attempt_id/answer",
            patch(attempts::update_answer),
        )
}
