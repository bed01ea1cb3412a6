use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Running,
    Submitted,
    AutoSubmitted,
    Terminated,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::Running => "running",
            AttemptStatus::Submitted => "submitted",
            AttemptStatus::AutoSubmitted => "auto_submitted",
            AttemptStatus::Terminated => "terminated",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AttemptStatus::Running)
    }
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttemptStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(AttemptStatus::Running),
            "submitted" => Ok(AttemptStatus::Submitted),
            "auto_submitted" => Ok(AttemptStatus::AutoSubmitted),
            "terminated" => Ok(AttemptStatus::Terminated),
            other => Err(format!("unknown attempt status '{}'", other)),
        }
    }
}

/// Integrity events the proctoring client is allowed to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationType {
    WindowBlur,
    WindowFocusChange,
    FullscreenExit,
    CopyAttempt,
    PasteAttempt,
    DevtoolsOpen,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub violation_type: ViolationType,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptAnswer {
    #[serde(alias = "questionID")]
    pub question_id: String,
    #[serde(default, alias = "answers")]
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub status: AttemptStatus,
    pub start_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub duration_sec: i64,
    pub violation_count: u32,
    pub violations: Vec<Violation>,
    pub answers: Vec<AttemptAnswer>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Attempt {
    pub fn is_running(&self) -> bool {
        self.status == AttemptStatus::Running
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.ends_at
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|a| a.question_id == question_id)
            .map(|a| a.answer.as_str())
    }
}
