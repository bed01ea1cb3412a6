use std::sync::Arc;

use uuid::Uuid;

use crate::database::store::{AttemptStore, CandidateStore};
use crate::error::{Error, Result};
use crate::models::attempt::{Attempt, AttemptAnswer, AttemptStatus, ViolationType};
use crate::services::lifecycle::{self, EventAction, ExamPolicy};
use crate::utils::time::Clock;

/// Upper bound on attempts finalized by one sweep pass.
const SWEEP_BATCH: i64 = 200;

#[derive(Debug, Clone)]
pub struct EventOutcome {
    pub action: EventAction,
    pub attempt: Attempt,
}

#[derive(Clone)]
pub struct AttemptService {
    attempts: Arc<dyn AttemptStore>,
    candidates: Arc<dyn CandidateStore>,
    clock: Arc<dyn Clock>,
    policy: ExamPolicy,
}

impl AttemptService {
    pub fn new(
        attempts: Arc<dyn AttemptStore>,
        candidates: Arc<dyn CandidateStore>,
        clock: Arc<dyn Clock>,
        policy: ExamPolicy,
    ) -> Self {
        Self {
            attempts,
            candidates,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> &ExamPolicy {
        &self.policy
    }

    /// Starts a new attempt. A still-open running attempt blocks the start;
    /// an expired one is finalized first.
    pub async fn create_attempt(&self, candidate_id: Uuid) -> Result<Attempt> {
        if self.candidates.find_by_id(candidate_id).await?.is_none() {
            return Err(Error::NotFound("Candidate not found".to_string()));
        }

        let now = self.clock.now();

        if let Some(existing) = self.attempts.find_latest_running(candidate_id).await? {
            if !existing.is_expired_at(now) {
                return Err(Error::Conflict(
                    "Candidate already has a running attempt".to_string(),
                ));
            }
            let closed = self
                .attempts
                .update_with(existing.id, &mut |a: &mut Attempt| {
                    lifecycle::expire(a, now);
                    Ok(())
                })
                .await?;
            tracing::info!(
                attempt_id = %closed.id,
                %candidate_id,
                status = %closed.status,
                "closed expired attempt before starting a new one"
            );
        }

        let attempt = lifecycle::new_attempt(candidate_id, &self.policy, now);
        self.attempts.insert(&attempt).await?;

        tracing::info!(
            attempt_id = %attempt.id,
            %candidate_id,
            ends_at = %attempt.ends_at,
            "attempt started"
        );
        Ok(attempt)
    }

    pub async fn get_attempt(&self, attempt_id: Uuid) -> Result<Attempt> {
        self.attempts
            .find_by_id(attempt_id)
            .await?
            .ok_or_else(|| Error::NotFound("Attempt not found".to_string()))
    }

    pub async fn get_running_attempt(&self, candidate_id: Uuid) -> Result<Attempt> {
        self.attempts
            .find_latest_running(candidate_id)
            .await?
            .ok_or_else(|| Error::NotFound("No active attempt found for this candidate".to_string()))
    }

    pub async fn register_event(
        &self,
        attempt_id: Uuid,
        event_type: ViolationType,
        answers: Option<Vec<AttemptAnswer>>,
    ) -> Result<EventOutcome> {
        let now = self.clock.now();
        let policy = self.policy;
        let mut answers = answers;
        let mut action = None;

        let attempt = self
            .attempts
            .update_with(attempt_id, &mut |a: &mut Attempt| {
                action = Some(lifecycle::register_event(
                    a,
                    event_type,
                    answers.take(),
                    &policy,
                    now,
                ));
                Ok(())
            })
            .await?;

        let action = action.ok_or_else(|| {
            Error::Internal("attempt store skipped the event mutation".to_string())
        })?;

        match action {
            EventAction::Warn => tracing::info!(
                %attempt_id,
                violation = ?event_type,
                violation_count = attempt.violation_count,
                "proctoring violation recorded, candidate warned"
            ),
            EventAction::Terminate => tracing::warn!(
                %attempt_id,
                violation = ?event_type,
                violation_count = attempt.violation_count,
                duration_sec = attempt.duration_sec,
                "attempt terminated"
            ),
            EventAction::Unchanged(status) => tracing::debug!(
                %attempt_id,
                %status,
                "event ignored on finished attempt"
            ),
        }

        Ok(EventOutcome { action, attempt })
    }

    pub async fn submit_attempt(
        &self,
        attempt_id: Uuid,
        answers: Option<Vec<AttemptAnswer>>,
        is_auto_submit: bool,
    ) -> Result<Attempt> {
        let now = self.clock.now();
        let mut answers = answers;

        let attempt = self
            .attempts
            .update_with(attempt_id, &mut |a: &mut Attempt| {
                lifecycle::submit(a, answers.take(), is_auto_submit, now).map(|_| ())
            })
            .await?;

        tracing::info!(
            %attempt_id,
            status = %attempt.status,
            is_auto_submit,
            duration_sec = attempt.duration_sec,
            answers = attempt.answers.len(),
            "attempt submitted"
        );
        Ok(attempt)
    }

    pub async fn update_answer(
        &self,
        attempt_id: Uuid,
        question_id: &str,
        answer: &str,
    ) -> Result<AttemptAnswer> {
        let now = self.clock.now();

        self.attempts
            .update_with(attempt_id, &mut |a: &mut Attempt| {
                lifecycle::update_answer(a, question_id, answer, now)
            })
            .await?;

        tracing::debug!(%attempt_id, question_id, "answer saved");
        Ok(AttemptAnswer {
            question_id: question_id.to_string(),
            answer: answer.to_string(),
        })
    }

    /// Terminates running attempts whose window has closed. Lazy expiry on
    /// write stays authoritative; this only shortens how long a stale
    /// attempt reads as running.
    pub async fn expire_overdue(&self) -> Result<usize> {
        let now = self.clock.now();
        let overdue = self.attempts.list_overdue_running(now, SWEEP_BATCH).await?;

        let mut expired = 0;
        for attempt_id in overdue {
            let mut changed = false;
            let result = self
                .attempts
                .update_with(attempt_id, &mut |a: &mut Attempt| {
                    changed = lifecycle::expire(a, now);
                    Ok(())
                })
                .await;

            match result {
                Ok(attempt) if changed => {
                    expired += 1;
                    debug_assert_eq!(attempt.status, AttemptStatus::Terminated);
                    tracing::info!(
                        %attempt_id,
                        duration_sec = attempt.duration_sec,
                        "expired attempt terminated by sweep"
                    );
                }
                Ok(_) => {}
                Err(Error::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(expired)
    }
}
