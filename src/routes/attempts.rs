use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::attempt_dto::{
        AttemptCreatedResponse, AttemptView, CreateAttemptRequest, RegisterEventRequest,
        RegisterEventResponse, RunningAttemptQuery, SubmitAttemptRequest, SubmitAttemptResponse,
        UpdateAnswerRequest, UpdateAnswerResponse,
    },
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/attempts",
    request_body = CreateAttemptRequest,
    responses(
        (status = 201, description = "Attempt started", body = Json<AttemptCreatedResponse>),
        (status = 404, description = "Candidate not found"),
        (status = 409, description = "Candidate already has a running attempt")
    )
)]
#[axum::debug_handler]
pub async fn create_attempt(
    State(state): State<AppState>,
    Json(payload): Json<CreateAttemptRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let attempt = state
        .attempt_service
        .create_attempt(payload.candidate_id)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AttemptCreatedResponse::from(&attempt)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/attempts",
    params(
        ("candidate_id" = Uuid, Query, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Latest running attempt", body = Json<AttemptView>),
        (status = 404, description = "No active attempt")
    )
)]
#[axum::debug_handler]
pub async fn get_running_attempt(
    State(state): State<AppState>,
    Query(query): Query<RunningAttemptQuery>,
) -> Result<impl IntoResponse> {
    let attempt = state
        .attempt_service
        .get_running_attempt(query.candidate_id)
        .await?;
    Ok(Json(AttemptView::from(&attempt)))
}

#[utoipa::path(
    get,
    path = "/api/attempts/{attempt_id}",
    params(
        ("attempt_id" = Uuid, Path, description = "Attempt ID")
    ),
    responses(
        (status = 200, description = "Attempt in any status", body = Json<AttemptView>),
        (status = 404, description = "Attempt not found")
    )
)]
#[axum::debug_handler]
pub async fn get_attempt(
    State(state): State<AppState>,
    Path(attempt_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let attempt = state.attempt_service.get_attempt(attempt_id).await?;
    Ok(Json(AttemptView::from(&attempt)))
}

#[utoipa::path(
    post,
    path = "/api/attempts/{attempt_id}/event",
    params(
        ("attempt_id" = Uuid, Path, description = "Attempt ID")
    ),
    request_body = RegisterEventRequest,
    responses(
        (status = 200, description = "Violation processed", body = Json<RegisterEventResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Attempt not found")
    )
)]
#[axum::debug_handler]
pub async fn register_event(
    State(state): State<AppState>,
    Path(attempt_id): Path<Uuid>,
    Json(payload): Json<RegisterEventRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let outcome = state
        .attempt_service
        .register_event(attempt_id, payload.event_type, payload.answers)
        .await?;
    Ok(Json(RegisterEventResponse {
        action: outcome.action,
        violation_count: outcome.attempt.violation_count,
    }))
}

#[utoipa::path(
    post,
    path = "/api/attempts/{attempt_id}/submit",
    params(
        ("attempt_id" = Uuid, Path, description = "Attempt ID")
    ),
    request_body = SubmitAttemptRequest,
    responses(
        (status = 200, description = "Attempt finalized", body = Json<SubmitAttemptResponse>),
        (status = 404, description = "Attempt not found"),
        (status = 409, description = "Attempt is not active")
    )
)]
#[axum::debug_handler]
pub async fn submit_attempt(
    State(state): State<AppState>,
    Path(attempt_id): Path<Uuid>,
    Json(payload): Json<SubmitAttemptRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let attempt = state
        .attempt_service
        .submit_attempt(attempt_id, payload.answers, payload.is_auto_submit)
        .await?;
    Ok(Json(SubmitAttemptResponse {
        attempt_id: attempt.id,
        final_status: attempt.status,
        duration_sec: attempt.duration_sec,
    }))
}

#[utoipa::path(
    patch,
    path = "/api/attempts/{attempt_id}/answer",
    params(
        ("attempt_id" = Uuid, Path, description = "Attempt ID")
    ),
    request_body = UpdateAnswerRequest,
    responses(
        (status = 200, description = "Answer saved", body = Json<UpdateAnswerResponse>),
        (status = 404, description = "Attempt not found"),
        (status = 409, description = "Attempt is not active")
    )
)]
#[axum::debug_handler]
pub async fn update_answer(
    State(state): State<AppState>,
    Path(attempt_id): Path<Uuid>,
    Json(payload): Json<UpdateAnswerRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let saved = state
        .attempt_service
        .update_answer(attempt_id, &payload.question_id, &payload.answer)
        .await?;
    Ok(Json(UpdateAnswerResponse::from(saved)))
}
