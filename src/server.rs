//! HTTP server initialization and runtime setup.
//!
//! Selects the storage backend, initializes it, and runs the Axum server
//! until a shutdown signal arrives.

use crate::config::Config;
use crate::domain::repositories::LinkStore;
use crate::infrastructure::persistence::{FileLinkStore, PgLinkStore};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The storage backend (Postgres pool or JSON file)
/// - Table / data file via `init()`
/// - Axum HTTP server with graceful shutdown
///
/// On shutdown the store is closed after the listener drains.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - Storage initialization fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = build_store(&config).await?;

    store.init().await?;
    tracing::info!(backend = store.backend(), "Storage initialized");

    let state = AppState::new(store.clone(), config.include_secrets_in_list);
    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("Storage closed, shutdown complete");

    Ok(())
}

/// Selects and connects the storage backend from configuration.
///
/// A Postgres connection string selects the relational backend; without
/// one, links live in the configured JSON file and a warning notes the
/// single-node limitation.
///
/// # Errors
///
/// Returns an error if the database connection cannot be established.
pub async fn build_store(config: &Config) -> Result<Arc<dyn LinkStore>> {
    if let Some(url) = &config.database_url {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
            .connect(url)
            .await?;
        tracing::info!("Connected to database");

        return Ok(Arc::new(PgLinkStore::new(pool)));
    }

    tracing::warn!(
        "No DATABASE_URL set, using file storage at {} (single process only)",
        config.data_file
    );

    Ok(Arc::new(FileLinkStore::new(&config.data_file)))
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install shutdown signal handler");

    tracing::info!("Shutdown signal received");
}
