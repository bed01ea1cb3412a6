use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub position: i32,
    pub question: String,
    pub created_at: DateTime<Utc>,
}

pub const DEFAULT_QUESTIONS: [&str; 7] = [
    "Explain closures and describe a practical case where capturing the surrounding environment simplifies the code.",
    "What is the difference between relational and document databases? When would you choose one over the other?",
    "Describe the principles of a RESTful API and explain what makes an API truly RESTful.",
    "What is middleware in an HTTP server? Give an example of a custom middleware and what it is responsible for.",
    "Explain how asynchronous code is structured with futures or promises. How does async/await improve it?",
    "What does a static type system add over a dynamically typed language? Name the main benefits and costs.",
    "Describe the SOLID principles and explain how each contributes to maintainable code.",
];
