use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{
    dto::question_dto::{QuestionListResponse, QuestionView},
    error::Result,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/questions",
    responses(
        (status = 200, description = "Exam question slate", body = Json<QuestionListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_questions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let questions = state.question_service.list_questions().await?;
    Ok(Json(QuestionListResponse {
        questions: questions.into_iter().map(QuestionView::from).collect(),
    }))
}
