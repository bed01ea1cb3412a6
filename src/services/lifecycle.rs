//! Attempt state machine.
//!
//! Every function here takes a single captured `now` and mutates one
//! attempt in place. Callers are responsible for running them inside an
//! atomic read-modify-write on the store.

use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::attempt::{Attempt, AttemptAnswer, AttemptStatus, Violation, ViolationType};
use crate::services::violation_policy::{self, PolicyDecision};
use crate::utils::time::elapsed_secs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamPolicy {
    pub exam_duration: Duration,
    pub max_warnings_allowed: u32,
}

impl Default for ExamPolicy {
    fn default() -> Self {
        Self {
            exam_duration: Duration::minutes(7),
            max_warnings_allowed: 1,
        }
    }
}

/// Outcome of a reported integrity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    Warn,
    Terminate,
    /// The attempt had already left `running`; its status is echoed back.
    Unchanged(AttemptStatus),
}

impl EventAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventAction::Warn => "warn",
            EventAction::Terminate => "terminate",
            EventAction::Unchanged(status) => status.as_str(),
        }
    }
}

impl Serialize for EventAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

pub fn new_attempt(candidate_id: Uuid, policy: &ExamPolicy, now: DateTime<Utc>) -> Attempt {
    Attempt {
        id: Uuid::new_v4(),
        candidate_id,
        status: AttemptStatus::Running,
        start_at: now,
        ends_at: now + policy.exam_duration,
        duration_sec: 0,
        violation_count: 0,
        violations: Vec::new(),
        answers: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

pub fn register_event(
    attempt: &mut Attempt,
    event_type: ViolationType,
    answers: Option<Vec<AttemptAnswer>>,
    policy: &ExamPolicy,
    now: DateTime<Utc>,
) -> EventAction {
    if !attempt.is_running() {
        return EventAction::Unchanged(attempt.status);
    }

    if attempt.is_expired_at(now) {
        replace_answers(attempt, answers);
        finalize(attempt, AttemptStatus::Terminated, now);
        return EventAction::Terminate;
    }

    attempt.violations.push(Violation {
        violation_type: event_type,
        timestamp: now,
    });
    attempt.violation_count += 1;
    replace_answers(attempt, answers);
    attempt.updated_at = now;

    match violation_policy::decide(attempt.violation_count, policy.max_warnings_allowed) {
        PolicyDecision::Warn => EventAction::Warn,
        PolicyDecision::Terminate => {
            finalize(attempt, AttemptStatus::Terminated, now);
            EventAction::Terminate
        }
    }
}

pub fn submit(
    attempt: &mut Attempt,
    answers: Option<Vec<AttemptAnswer>>,
    is_auto_submit: bool,
    now: DateTime<Utc>,
) -> Result<AttemptStatus> {
    ensure_running(attempt)?;

    let final_status = match (attempt.is_expired_at(now), is_auto_submit) {
        (true, true) => AttemptStatus::AutoSubmitted,
        (true, false) => AttemptStatus::Terminated,
        (false, _) => AttemptStatus::Submitted,
    };

    replace_answers(attempt, answers);
    finalize(attempt, final_status, now);
    Ok(final_status)
}

pub fn update_answer(
    attempt: &mut Attempt,
    question_id: &str,
    answer: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    ensure_running(attempt)?;
    if attempt.is_expired_at(now) {
        return Err(Error::Conflict("Exam time has expired".to_string()));
    }

    upsert_answer(&mut attempt.answers, question_id, answer);
    attempt.updated_at = now;
    Ok(())
}

/// Terminates a running attempt whose window has closed. Returns whether
/// anything changed.
pub fn expire(attempt: &mut Attempt, now: DateTime<Utc>) -> bool {
    if !attempt.is_running() || !attempt.is_expired_at(now) {
        return false;
    }
    finalize(attempt, AttemptStatus::Terminated, now);
    true
}

/// Wholesale answer write. `None` and an empty batch leave the stored
/// answers untouched; repeated question ids inside a batch keep the last one.
pub fn replace_answers(attempt: &mut Attempt, batch: Option<Vec<AttemptAnswer>>) {
    let Some(batch) = batch.filter(|b| !b.is_empty()) else {
        return;
    };

    let mut answers = Vec::with_capacity(batch.len());
    for item in batch {
        upsert_answer(&mut answers, &item.question_id, &item.answer);
    }
    attempt.answers = answers;
}

/// Per-question write: replaces the entry with the same id or appends.
pub fn upsert_answer(answers: &mut Vec<AttemptAnswer>, question_id: &str, answer: &str) {
    match answers.iter_mut().find(|a| a.question_id == question_id) {
        Some(existing) => existing.answer = answer.to_string(),
        None => answers.push(AttemptAnswer {
            question_id: question_id.to_string(),
            answer: answer.to_string(),
        }),
    }
}

fn ensure_running(attempt: &Attempt) -> Result<()> {
    if attempt.is_running() {
        Ok(())
    } else {
        Err(Error::Conflict(format!(
            "Attempt is not active (status: {})",
            attempt.status
        )))
    }
}

fn finalize(attempt: &mut Attempt, status: AttemptStatus, now: DateTime<Utc>) {
    attempt.status = status;
    attempt.duration_sec = elapsed_secs(attempt.start_at, now);
    attempt.updated_at = now;
}
