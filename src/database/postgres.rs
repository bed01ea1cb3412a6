use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::store::{AttemptMutation, AttemptStore, CandidateStore, QuestionStore};
use crate::error::{Error, Result};
use crate::models::attempt::{Attempt, AttemptAnswer, Violation};
use crate::models::candidate::{Candidate, NewCandidate};
use crate::models::question::Question;

const ATTEMPT_COLUMNS: &str = r#"
    id, candidate_id, status, start_at, ends_at, duration_sec,
    violation_count, violations, answers, created_at, updated_at
"#;

#[derive(Debug, FromRow)]
struct AttemptRow {
    id: Uuid,
    candidate_id: Uuid,
    status: String,
    start_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    duration_sec: i64,
    violation_count: i32,
    violations: Json<Vec<Violation>>,
    answers: Json<Vec<AttemptAnswer>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AttemptRow> for Attempt {
    type Error = Error;

    fn try_from(row: AttemptRow) -> Result<Self> {
        Ok(Attempt {
            id: row.id,
            candidate_id: row.candidate_id,
            status: row.status.parse().map_err(Error::Internal)?,
            start_at: row.start_at,
            ends_at: row.ends_at,
            duration_sec: row.duration_sec,
            violation_count: u32::try_from(row.violation_count).map_err(|_| {
                Error::Internal(format!(
                    "attempt {} has negative violation_count {}",
                    row.id, row.violation_count
                ))
            })?,
            violations: row.violations.0,
            answers: row.answers.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct PgAttemptStore {
    pool: PgPool,
}

impl PgAttemptStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttemptStore for PgAttemptStore {
    async fn insert(&self, attempt: &Attempt) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO attempts (
                id, candidate_id, status, start_at, ends_at, duration_sec,
                violation_count, violations, answers, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(attempt.id)
        .bind(attempt.candidate_id)
        .bind(attempt.status.as_str())
        .bind(attempt.start_at)
        .bind(attempt.ends_at)
        .bind(attempt.duration_sec)
        .bind(attempt.violation_count as i32)
        .bind(Json(&attempt.violations))
        .bind(Json(&attempt.answers))
        .bind(attempt.created_at)
        .bind(attempt.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match Error::from(e) {
            Error::Conflict(_) => Error::Conflict(
                "Candidate already has a running attempt".to_string(),
            ),
            other => other,
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Attempt>> {
        let row = sqlx::query_as::<_, AttemptRow>(&format!(
            "SELECT {} FROM attempts WHERE id = $1",
            ATTEMPT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Attempt::try_from).transpose()
    }

    async fn find_latest_running(&self, candidate_id: Uuid) -> Result<Option<Attempt>> {
        let row = sqlx::query_as::<_, AttemptRow>(&format!(
            r#"SELECT {} FROM attempts
               WHERE candidate_id = $1 AND status = 'running'
               ORDER BY created_at DESC
               LIMIT 1"#,
            ATTEMPT_COLUMNS
        ))
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Attempt::try_from).transpose()
    }

    async fn list_overdue_running(&self, now: DateTime<Utc>, limit: i64) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT id FROM attempts
               WHERE status = 'running' AND ends_at <= $1
               ORDER BY ends_at
               LIMIT $2"#,
        )
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn update_with(&self, id: Uuid, mutation: AttemptMutation<'_>) -> Result<Attempt> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, AttemptRow>(&format!(
            "SELECT {} FROM attempts WHERE id = $1 FOR UPDATE",
            ATTEMPT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::NotFound("Attempt not found".to_string()))?;

        let before = Attempt::try_from(row)?;
        let mut attempt = before.clone();
        // An error here drops `tx`, rolling back and releasing the row lock.
        mutation(&mut attempt)?;

        if attempt != before {
            sqlx::query(
                r#"
                UPDATE attempts
                SET status = $2, duration_sec = $3, violation_count = $4,
                    violations = $5, answers = $6, updated_at = $7
                WHERE id = $1
                "#,
            )
            .bind(attempt.id)
            .bind(attempt.status.as_str())
            .bind(attempt.duration_sec)
            .bind(attempt.violation_count as i32)
            .bind(Json(&attempt.violations))
            .bind(Json(&attempt.answers))
            .bind(attempt.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(attempt)
    }
}

#[derive(Clone)]
pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn insert(&self, candidate: NewCandidate) -> Result<Candidate> {
        let created = sqlx::query_as::<_, Candidate>(
            r#"
            INSERT INTO candidates (id, email, linkedin_profile_url, github_profile_url, resume)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, linkedin_profile_url, github_profile_url, resume, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(candidate.email)
        .bind(candidate.linkedin_profile_url)
        .bind(candidate.github_profile_url)
        .bind(candidate.resume)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match Error::from(e) {
            Error::Conflict(_) => Error::Conflict("Candidate already exists".to_string()),
            other => other,
        })?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>(
            r#"SELECT id, email, linkedin_profile_url, github_profile_url, resume, created_at
               FROM candidates WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(candidate)
    }
}

#[derive(Clone)]
pub struct PgQuestionStore {
    pool: PgPool,
}

impl PgQuestionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionStore for PgQuestionStore {
    async fn list(&self, limit: i64) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            r#"SELECT id, position, question, created_at
               FROM questions
               ORDER BY position, created_at
               LIMIT $1"#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    async fn replace_all(&self, texts: Vec<String>) -> Result<Vec<Question>> {
        let mut tx = self.pool.begin().await?;
        let deleted = sqlx::query("DELETE FROM questions")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tracing::info!(deleted, "cleared existing questions");

        let mut created = Vec::with_capacity(texts.len());
        for (idx, text) in texts.into_iter().enumerate() {
            let question = sqlx::query_as::<_, Question>(
                r#"INSERT INTO questions (id, position, question)
                   VALUES ($1, $2, $3)
                   RETURNING id, position, question, created_at"#,
            )
            .bind(Uuid::new_v4())
            .bind(idx as i32 + 1)
            .bind(text)
            .fetch_one(&mut *tx)
            .await?;
            created.push(question);
        }

        tx.commit().await?;
        Ok(created)
    }
}
