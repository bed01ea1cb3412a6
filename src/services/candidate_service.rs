use std::sync::Arc;

use uuid::Uuid;

use crate::database::store::CandidateStore;
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, NewCandidate};

#[derive(Clone)]
pub struct CandidateService {
    store: Arc<dyn CandidateStore>,
}

impl CandidateService {
    pub fn new(store: Arc<dyn CandidateStore>) -> Self {
        Self { store }
    }

    pub async fn create_candidate(&self, candidate: NewCandidate) -> Result<Candidate> {
        let created = self.store.insert(candidate).await?;
        tracing::info!(candidate_id = %created.id, "candidate registered");
        Ok(created)
    }

    pub async fn get_candidate(&self, id: Uuid) -> Result<Candidate> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))
    }
}
