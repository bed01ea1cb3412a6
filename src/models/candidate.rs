use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    pub email: String,
    pub linkedin_profile_url: String,
    pub github_profile_url: String,
    pub resume: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub email: String,
    pub linkedin_profile_url: String,
    pub github_profile_url: String,
    pub resume: Option<String>,
}
