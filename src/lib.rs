pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::memory::{InMemoryAttemptStore, InMemoryCandidateStore, InMemoryQuestionStore};
use crate::database::postgres::{PgAttemptStore, PgCandidateStore, PgQuestionStore};
use crate::database::store::{AttemptStore, CandidateStore, QuestionStore};
use crate::services::{
    attempt_service::AttemptService, candidate_service::CandidateService,
    lifecycle::ExamPolicy, question_service::QuestionService,
};
use crate::utils::time::{Clock, SystemClock};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub attempt_service: AttemptService,
    pub candidate_service: CandidateService,
    pub question_service: QuestionService,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        Self::from_stores(
            Arc::new(PgAttemptStore::new(pool.clone())),
            Arc::new(PgCandidateStore::new(pool.clone())),
            Arc::new(PgQuestionStore::new(pool)),
            Arc::new(SystemClock),
            config.exam_policy(),
            config.question_slate_size,
        )
    }

    /// State backed by process-local stores.
    pub fn in_memory(policy: ExamPolicy, slate_size: i64, clock: Arc<dyn Clock>) -> Self {
        Self::from_stores(
            Arc::new(InMemoryAttemptStore::new()),
            Arc::new(InMemoryCandidateStore::new()),
            Arc::new(InMemoryQuestionStore::new()),
            clock,
            policy,
            slate_size,
        )
    }

    pub fn from_stores(
        attempts: Arc<dyn AttemptStore>,
        candidates: Arc<dyn CandidateStore>,
        questions: Arc<dyn QuestionStore>,
        clock: Arc<dyn Clock>,
        policy: ExamPolicy,
        slate_size: i64,
    ) -> Self {
        let attempt_service = AttemptService::new(attempts, candidates.clone(), clock, policy);
        let candidate_service = CandidateService::new(candidates);
        let question_service = QuestionService::new(questions, slate_size);

        Self {
            attempt_service,
            candidate_service,
            question_service,
        }
    }
}
