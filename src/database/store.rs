use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::attempt::Attempt;
use crate::models::candidate::{Candidate, NewCandidate};
use crate::models::question::Question;

/// In-place mutation applied under the store's per-attempt lock. Returning
/// an error aborts the write.
pub type AttemptMutation<'a> = &'a mut (dyn FnMut(&mut Attempt) -> Result<()> + Send);

#[async_trait]
pub trait AttemptStore: Send + Sync {
    /// Fails with `Conflict` if the candidate already has a running attempt.
    async fn insert(&self, attempt: &Attempt) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Attempt>>;

    async fn find_latest_running(&self, candidate_id: Uuid) -> Result<Option<Attempt>>;

    async fn list_overdue_running(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Uuid>>;

    /// Atomic read-modify-write of one attempt. Concurrent calls on the same
    /// id are serialized; calls on different ids never wait on each other.
    async fn update_with(&self, id: Uuid, mutation: AttemptMutation<'_>) -> Result<Attempt>;
}

#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Fails with `Conflict` when any contact field is already taken.
    async fn insert(&self, candidate: NewCandidate) -> Result<Candidate>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Candidate>>;
}

#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Questions in insertion order, at most `limit` of them.
    async fn list(&self, limit: i64) -> Result<Vec<Question>>;

    async fn replace_all(&self, texts: Vec<String>) -> Result<Vec<Question>>;
}
