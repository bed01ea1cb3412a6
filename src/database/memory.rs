//! Process-local stores used by tests and database-less local runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::store::{AttemptMutation, AttemptStore, CandidateStore, QuestionStore};
use crate::error::{Error, Result};
use crate::models::attempt::Attempt;
use crate::models::candidate::{Candidate, NewCandidate};
use crate::models::question::Question;

fn poisoned<T>(_: PoisonError<T>) -> Error {
    Error::Internal("in-memory store lock poisoned".to_string())
}

#[derive(Clone, Default)]
pub struct InMemoryAttemptStore {
    attempts: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Attempt>>>>>,
}

impl InMemoryAttemptStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, id: Uuid) -> Result<Option<Arc<Mutex<Attempt>>>> {
        let map = self.attempts.read().map_err(poisoned)?;
        Ok(map.get(&id).cloned())
    }

    fn snapshot(&self) -> Result<Vec<Attempt>> {
        let map = self.attempts.read().map_err(poisoned)?;
        map.values()
            .map(|slot| slot.lock().map(|a| a.clone()).map_err(poisoned))
            .collect()
    }
}

#[async_trait]
impl AttemptStore for InMemoryAttemptStore {
    async fn insert(&self, attempt: &Attempt) -> Result<()> {
        let mut map = self.attempts.write().map_err(poisoned)?;

        for slot in map.values() {
            let existing = slot.lock().map_err(poisoned)?;
            if existing.candidate_id == attempt.candidate_id && existing.is_running() {
                return Err(Error::Conflict(
                    "Candidate already has a running attempt".to_string(),
                ));
            }
        }

        if map.contains_key(&attempt.id) {
            return Err(Error::Conflict(format!("Attempt {} already exists", attempt.id)));
        }
        map.insert(attempt.id, Arc::new(Mutex::new(attempt.clone())));
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Attempt>> {
        match self.entry(id)? {
            Some(slot) => Ok(Some(slot.lock().map_err(poisoned)?.clone())),
            None => Ok(None),
        }
    }

    async fn find_latest_running(&self, candidate_id: Uuid) -> Result<Option<Attempt>> {
        Ok(self
            .snapshot()?
            .into_iter()
            .filter(|a| a.candidate_id == candidate_id && a.is_running())
            .max_by_key(|a| a.created_at))
    }

    async fn list_overdue_running(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Uuid>> {
        let mut overdue: Vec<Attempt> = self
            .snapshot()?
            .into_iter()
            .filter(|a| a.is_running() && a.is_expired_at(now))
            .collect();
        overdue.sort_by_key(|a| a.ends_at);
        Ok(overdue
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|a| a.id)
            .collect())
    }

    async fn update_with(&self, id: Uuid, mutation: AttemptMutation<'_>) -> Result<Attempt> {
        let slot = self
            .entry(id)?
            .ok_or_else(|| Error::NotFound("Attempt not found".to_string()))?;
        let mut stored = slot.lock().map_err(poisoned)?;

        let mut working = stored.clone();
        mutation(&mut working)?;
        *stored = working.clone();
        Ok(working)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCandidateStore {
    candidates: Arc<Mutex<Vec<Candidate>>>,
}

impl InMemoryCandidateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CandidateStore for InMemoryCandidateStore {
    async fn insert(&self, candidate: NewCandidate) -> Result<Candidate> {
        let mut candidates = self.candidates.lock().map_err(poisoned)?;

        let duplicate = candidates.iter().any(|c| {
            c.email == candidate.email
                || c.linkedin_profile_url == candidate.linkedin_profile_url
                || c.github_profile_url == candidate.github_profile_url
                || (candidate.resume.is_some() && c.resume == candidate.resume)
        });
        if duplicate {
            return Err(Error::Conflict("Candidate already exists".to_string()));
        }

        let created = Candidate {
            id: Uuid::new_v4(),
            email: candidate.email,
            linkedin_profile_url: candidate.linkedin_profile_url,
            github_profile_url: candidate.github_profile_url,
            resume: candidate.resume,
            created_at: Utc::now(),
        };
        candidates.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Candidate>> {
        let candidates = self.candidates.lock().map_err(poisoned)?;
        Ok(candidates.iter().find(|c| c.id == id).cloned())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryQuestionStore {
    questions: Arc<Mutex<Vec<Question>>>,
}

impl InMemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionStore for InMemoryQuestionStore {
    async fn list(&self, limit: i64) -> Result<Vec<Question>> {
        let questions = self.questions.lock().map_err(poisoned)?;
        Ok(questions
            .iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn replace_all(&self, texts: Vec<String>) -> Result<Vec<Question>> {
        let mut questions = self.questions.lock().map_err(poisoned)?;
        let now = Utc::now();
        *questions = texts
            .into_iter()
            .enumerate()
            .map(|(idx, question)| Question {
                id: Uuid::new_v4(),
                position: idx as i32 + 1,
                question,
                created_at: now,
            })
            .collect();
        Ok(questions.clone())
    }
}
