use std::sync::Arc;

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use courses_api::app::{app_with_config, AppState};
use courses_api::auth::PasswordHasher;
use courses_api::config::{AppConfig, Environment};
use courses_api::database::{DatabaseManager, MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Starting Courses API in {:?} mode", config.environment);

    let store: Arc<dyn Store> = match &config.database.url {
        Some(_) => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to the database")?;
            if config.database.ensure_schema {
                DatabaseManager::ensure_schema(&pool)
                    .await
                    .context("failed to prepare the database schema")?;
            }
            Arc::new(PgStore::new(pool))
        }
        None if config.environment == Environment::Production => {
            bail!("DATABASE_URL must be set in production");
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store, data will not persist");
            Arc::new(MemoryStore::new())
        }
    };

    let hasher = PasswordHasher::new(config.security.password.into())
        .context("invalid password hashing parameters")?;

    let app = app_with_config(AppState::new(store, hasher), &config);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Courses API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
