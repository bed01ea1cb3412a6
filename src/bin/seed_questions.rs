use std::sync::Arc;

use proctor_backend::{
    config::{get_config, init_config},
    database::{
        pool::{create_pool, run_migrations},
        postgres::PgQuestionStore,
    },
    services::question_service::QuestionService,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let service = QuestionService::new(
        Arc::new(PgQuestionStore::new(pool.clone())),
        config.question_slate_size,
    );
    let created = service.seed_default_questions().await?;

    for question in &created {
        let preview: String = question.question.chars().take(50).collect();
        info!("{}. {}...", question.position, preview);
    }

    pool.close().await;
    info!("Seeding complete");
    Ok(())
}
