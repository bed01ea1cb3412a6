use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::candidate_dto::{CandidateCreatedResponse, CandidateResponse, CreateCandidatePayload},
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/candidates",
    request_body = CreateCandidatePayload,
    responses(
        (status = 201, description = "Candidate registered", body = Json<CandidateCreatedResponse>),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Candidate already exists")
    )
)]
#[axum::debug_handler]
pub async fn create_candidate(
    State(state): State<AppState>,
    Json(payload): Json<CreateCandidatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let candidate = state
        .candidate_service
        .create_candidate(payload.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CandidateCreatedResponse {
            candidate_id: candidate.id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/candidates/{candidate_id}",
    params(
        ("candidate_id" = Uuid, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Candidate profile", body = Json<CandidateResponse>),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let candidate = state.candidate_service.get_candidate(candidate_id).await?;
    Ok(Json(CandidateResponse::from(candidate)))
}
