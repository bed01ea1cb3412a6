use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::attempt::{Attempt, AttemptAnswer, AttemptStatus, Violation, ViolationType};
use crate::services::lifecycle::EventAction;

const MAX_ANSWER_LEN: usize = 20_000;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAttemptRequest {
    pub candidate_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptCreatedResponse {
    pub attempt_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl From<&Attempt> for AttemptCreatedResponse {
    fn from(attempt: &Attempt) -> Self {
        Self {
            attempt_id: attempt.id,
            start_at: attempt.start_at,
            ends_at: attempt.ends_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunningAttemptQuery {
    pub candidate_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerView {
    pub question_id: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViolationView {
    #[serde(rename = "type")]
    pub violation_type: ViolationType,
    pub timestamp: DateTime<Utc>,
}

/// External read model of an attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttemptView {
    pub attempt_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: AttemptStatus,
    pub violation_count: u32,
    pub violations: Vec<ViolationView>,
    pub answers: Vec<AnswerView>,
}

impl From<&Attempt> for AttemptView {
    fn from(attempt: &Attempt) -> Self {
        Self {
            attempt_id: attempt.id,
            start_at: attempt.start_at,
            ends_at: attempt.ends_at,
            status: attempt.status,
            violation_count: attempt.violation_count,
            violations: attempt.violations.iter().map(ViolationView::from).collect(),
            answers: attempt.answers.iter().map(AnswerView::from).collect(),
        }
    }
}

impl From<&Violation> for ViolationView {
    fn from(v: &Violation) -> Self {
        Self {
            violation_type: v.violation_type,
            timestamp: v.timestamp,
        }
    }
}

impl From<&AttemptAnswer> for AnswerView {
    fn from(a: &AttemptAnswer) -> Self {
        Self {
            question_id: a.question_id.clone(),
            answer: a.answer.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterEventRequest {
    #[serde(rename = "type")]
    pub event_type: ViolationType,
    #[validate(custom(function = "validate_answer_batch"))]
    pub answers: Option<Vec<AttemptAnswer>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterEventResponse {
    pub action: EventAction,
    pub violation_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitAttemptRequest {
    #[validate(custom(function = "validate_answer_batch"))]
    pub answers: Option<Vec<AttemptAnswer>>,
    #[serde(default)]
    pub is_auto_submit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAttemptResponse {
    pub attempt_id: Uuid,
    pub final_status: AttemptStatus,
    pub duration_sec: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateAnswerRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "questionID")]
    pub question_id: String,
    #[validate(length(max = 20000))]
    #[serde(default, alias = "answers")]
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAnswerResponse {
    pub question_id: String,
    pub answer: String,
}

impl From<AttemptAnswer> for UpdateAnswerResponse {
    fn from(a: AttemptAnswer) -> Self {
        Self {
            question_id: a.question_id,
            answer: a.answer,
        }
    }
}

fn validate_answer_batch(answers: &Vec<AttemptAnswer>) -> Result<(), ValidationError> {
    for item in answers {
        if item.question_id.is_empty() {
            return Err(ValidationError::new("empty_question_id"));
        }
        if item.answer.len() > MAX_ANSWER_LEN {
            return Err(ValidationError::new("answer_too_long"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::lifecycle::{self, ExamPolicy};
    use serde_json::json;

    #[test]
    fn projection_preserves_order_and_omits_internal_fields() {
        let now = Utc::now();
        let mut attempt = lifecycle::new_attempt(Uuid::new_v4(), &ExamPolicy::default(), now);
        lifecycle::update_answer(&mut attempt, "b", "second", now).unwrap();
        lifecycle::update_answer(&mut attempt, "a", "first", now).unwrap();
        lifecycle::register_event(
            &mut attempt,
            ViolationType::WindowBlur,
            None,
            &ExamPolicy::default(),
            now,
        );

        let view = AttemptView::from(&attempt);
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["answers"][0]["question_id"], "b");
        assert_eq!(value["answers"][1]["question_id"], "a");
        assert_eq!(value["violations"][0]["type"], "window-blur");
        assert_eq!(value["status"], "running");
        assert!(value.get("candidate_id").is_none());
        assert!(value.get("duration_sec").is_none());

        let back: AttemptView = serde_json::from_value(value).unwrap();
        assert_eq!(back, view);
    }

    #[test]
    fn event_request_accepts_legacy_answer_keys() {
        let req: RegisterEventRequest = serde_json::from_value(json!({
            "type": "devtools-open",
            "answers": [{ "questionID": "q1", "answers": "text" }]
        }))
        .unwrap();
        assert_eq!(req.event_type, ViolationType::DevtoolsOpen);
        let answers = req.answers.unwrap();
        assert_eq!(answers[0].question_id, "q1");
        assert_eq!(answers[0].answer, "text");
    }

    #[test]
    fn unknown_violation_type_is_rejected() {
        let parsed = serde_json::from_value::<RegisterEventRequest>(json!({ "type": "screenshot" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn empty_question_id_fails_validation() {
        let req = SubmitAttemptRequest {
            answers: Some(vec![AttemptAnswer {
                question_id: String::new(),
                answer: "x".to_string(),
            }]),
            is_auto_submit: false,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn event_action_serializes_as_plain_string() {
        let resp = RegisterEventResponse {
            action: EventAction::Unchanged(AttemptStatus::AutoSubmitted),
            violation_count: 0,
        };
        assert_eq!(
            serde_json::to_value(resp).unwrap(),
            json!({ "action": "auto_submitted", "violation_count": 0 })
        );
    }
}
