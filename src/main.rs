use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use project2_api::config::{self, Environment};
use project2_api::database::{DatabaseManager, MemoryStorage, PgStorage, Storage};
use project2_api::media::CloudinaryHost;
use project2_api::middleware::session::spawn_purge_task;
use project2_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, TOKEN_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("project2_api=debug,tower_http=info")),
        )
        .init();

    let config = config::config().clone();
    tracing::info!("Starting project2-api in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        if config.environment != Environment::Development {
            anyhow::bail!("TOKEN_SECRET must be set outside development");
        }
        tracing::warn!("TOKEN_SECRET is not set; protected routes answer 401 and login fails");
    }

    let store: Arc<dyn Storage> = match (&config.database.url, config.environment) {
        (Some(_), _) => {
            let manager = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            manager.migrate().await.context("failed to run migrations")?;
            Arc::new(PgStorage::new(manager.pool()))
        }
        (None, Environment::Development) => {
            tracing::warn!("DATABASE_URL not set; using in-memory storage, data is lost on exit");
            Arc::new(MemoryStorage::new())
        }
        (None, _) => anyhow::bail!("DATABASE_URL must be set outside development"),
    };

    let purge = spawn_purge_task(
        store.clone(),
        Duration::from_secs(config.database.session_purge_interval_secs),
    );

    let media = Arc::new(CloudinaryHost::new(config.media.clone()));
    let port = config.server.port;
    let app = project2_api::app(AppState::new(config, store, media));

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("project2-api listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    purge.abort();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
