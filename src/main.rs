use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use hungry_food_api::auth::TokenService;
use hungry_food_api::config::{AppConfig, StorageBackend};
use hungry_food_api::database::{DocumentStore, MemoryStore, PostgresStore};
use hungry_food_api::{app, cors_layer, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up ACCESS_TOKEN_SECRET, DB_USER, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting HungryFood API in {:?} mode", config.environment);

    let postgres = match config.database.backend {
        StorageBackend::Postgres => {
            let store = PostgresStore::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            store.ensure_schema().await.context("failed to prepare collections")?;
            Some(store)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on exit");
            None
        }
    };

    let store: Arc<dyn DocumentStore> = match &postgres {
        Some(store) => Arc::new(store.clone()),
        None => Arc::new(MemoryStore::new()),
    };
    store.ping().await.context("storage ping failed")?;
    tracing::info!("Storage reachable");

    let state = AppState::new(store, TokenService::from_config(&config.security));
    let router = app(state, cors_layer(&config.security.cors_origins));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("HungryFood is running on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(store) = postgres {
        store.close().await;
    }
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
