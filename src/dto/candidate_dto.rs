use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::candidate::{Candidate, NewCandidate};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCandidatePayload {
    #[validate(email)]
    pub email: String,
    #[validate(url)]
    pub linkedin_profile_url: String,
    #[validate(url)]
    pub github_profile_url: String,
    #[validate(length(min = 1))]
    pub resume: Option<String>,
}

impl From<CreateCandidatePayload> for NewCandidate {
    fn from(p: CreateCandidatePayload) -> Self {
        Self {
            email: p.email.trim().to_lowercase(),
            linkedin_profile_url: p.linkedin_profile_url.trim().to_string(),
            github_profile_url: p.github_profile_url.trim().to_string(),
            resume: p.resume,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateCreatedResponse {
    pub candidate_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResponse {
    pub candidate_id: Uuid,
    pub email: String,
    pub linkedin_profile_url: String,
    pub github_profile_url: String,
    pub resume: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Candidate> for CandidateResponse {
    fn from(c: Candidate) -> Self {
        Self {
            candidate_id: c.id,
            email: c.email,
            linkedin_profile_url: c.linkedin_profile_url,
            github_profile_url: c.github_profile_url,
            resume: c.resume,
            created_at: c.created_at,
        }
    }
}
