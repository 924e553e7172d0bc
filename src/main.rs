//! usat-ledger server entry point.
//!
//! Loads configuration, opens the store, and serves the REST API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use usat_ledger::api;
use usat_ledger::app_state::AppState;
use usat_ledger::config::{AppConfig, LogFormat};
use usat_ledger::persistence::{InMemoryStore, LedgerStore, PostgresStore, UserStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(
        addr = %config.listen_addr,
        persistence = config.persistence_enabled,
        monthly_rate = config.accrual.monthly_rate(),
        step_seconds = config.accrual.step_seconds(),
        "starting usat-ledger"
    );

    // Build persistence layer
    let (users, ledger): (Arc<dyn UserStore>, Arc<dyn LedgerStore>) =
        if config.persistence_enabled {
            let store = PostgresStore::connect(&config)
                .await
                .context("connecting to PostgreSQL")?;
            if config.run_migrations {
                store.migrate().await.context("running migrations")?;
                tracing::info!("migrations applied");
            }
            let store = Arc::new(store);
            (
                Arc::clone(&store) as Arc<dyn UserStore>,
                store as Arc<dyn LedgerStore>,
            )
        } else {
            tracing::warn!("persistence disabled; using in-memory store");
            let store = Arc::new(InMemoryStore::new());
            (
                Arc::clone(&store) as Arc<dyn UserStore>,
                store as Arc<dyn LedgerStore>,
            )
        };

    // Build application
    let app_state = AppState::new(users, ledger, &config);
    let app = api::build_app(app_state, Duration::from_secs(config.request_timeout_secs));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
