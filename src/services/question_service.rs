use std::sync::Arc;

use crate::database::store::QuestionStore;
use crate::error::Result;
use crate::models::question::{Question, DEFAULT_QUESTIONS};

#[derive(Clone)]
pub struct QuestionService {
    store: Arc<dyn QuestionStore>,
    slate_size: i64,
}

impl QuestionService {
    pub fn new(store: Arc<dyn QuestionStore>, slate_size: i64) -> Self {
        Self {
            store,
            slate_size: slate_size.max(0),
        }
    }

    pub async fn list_questions(&self) -> Result<Vec<Question>> {
        self.store.list(self.slate_size).await
    }

    pub async fn seed_default_questions(&self) -> Result<Vec<Question>> {
        let texts = DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect();
        let created = self.store.replace_all(texts).await?;
        tracing::info!(count = created.len(), "seeded question slate");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::InMemoryQuestionStore;

    #[tokio::test]
    async fn listing_is_capped_and_ordered() {
        let store = Arc::new(InMemoryQuestionStore::new());
        store
            .replace_all((1..=10).map(|i| format!("Question {}", i)).collect())
            .await
            .unwrap();

        let service = QuestionService::new(store, 7);
        let questions = service.list_questions().await.unwrap();
        assert_eq!(questions.len(), 7);
        assert_eq!(questions[0].question, "Question 1");
        assert_eq!(questions[6].question, "Question 7");
    }

    #[tokio::test]
    async fn seeding_replaces_existing_slate() {
        let store = Arc::new(InMemoryQuestionStore::new());
        store.replace_all(vec!["stale".to_string()]).await.unwrap();

        let service = QuestionService::new(store, 7);
        let seeded = service.seed_default_questions().await.unwrap();
        assert_eq!(seeded.len(), DEFAULT_QUESTIONS.len());

        let listed = service.list_questions().await.unwrap();
        assert!(listed.iter().all(|q| q.question != "stale"));
        assert_eq!(listed[0].question, DEFAULT_QUESTIONS[0]);
    }
}
