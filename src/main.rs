use proctor_backend::{
    config::{get_config, init_config, LogFormat},
    database::pool::{create_pool, run_migrations},
    middleware::cors::cors_layer,
    routes, AppState,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config()?;
    init_tracing(config.log_format);

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let app_state = AppState::new(pool, config);
    info!(
        exam_duration_minutes = config.exam_duration_minutes,
        max_warnings_allowed = config.max_warnings_allowed,
        question_slate_size = config.question_slate_size,
        "exam policy loaded"
    );

    if let Some(interval_secs) = config.expiry_sweep_secs {
        let state = app_state.clone();
        info!(interval_secs, "starting attempt expiry sweep");
        tokio::spawn(async move {
            loop {
                match state.attempt_service.expire_overdue().await {
                    Ok(0) => {}
                    Ok(expired) => info!(expired, "expiry sweep finished"),
                    Err(e) => tracing::error!(error = ?e, "expiry sweep error"),
                }
                tokio::time::sleep(Duration::from_secs(interval_secs)).await;
            }
        });
    }

    let app = routes::api_router()
        .with_state(app_state)
        .layer(cors_layer(config.cors_origin.as_deref())?)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}
