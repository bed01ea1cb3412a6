use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::question::Question;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    pub question_id: Uuid,
    pub question: String,
}

impl From<Question> for QuestionView {
    fn from(q: Question) -> Self {
        Self {
            question_id: q.id,
            question: q.question,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionListResponse {
    pub questions: Vec<QuestionView>,
}
