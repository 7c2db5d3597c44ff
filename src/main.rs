use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use tourism_api::config::AppConfig;
use tourism_api::db;
use tourism_api::handlers;
use tourism_api::services::notifications::Notifier;
use tourism_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    if config.admin_email.is_empty() {
        tracing::warn!("ADMIN_EMAIL not set, admin emails will be skipped");
    }
    if config.admin_phone.is_empty() {
        tracing::warn!("ADMIN_PHONE not set, admin SMS will be skipped");
    }
    let notifier = Notifier::from_config(&config);

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        notifier,
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
