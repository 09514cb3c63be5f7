//! HTTP server initialization and runtime setup.
//!
//! Selects the link store, applies migrations, and runs the Axum server
//! until Ctrl+C or SIGTERM.

use crate::config::Config;
use crate::domain::repositories::{ShortLinkRepository, TokenRepository};
use crate::infrastructure::persistence::{
    InMemoryShortLinkRepository, InMemoryTokenRepository, PgShortLinkRepository,
    PgTokenRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;

/// Opens a PostgreSQL pool with the configured limits.
///
/// # Errors
///
/// Fails when no database is configured or the first connection cannot be
/// established.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let db = config
        .database
        .as_ref()
        .context("Set DATABASE_URL or DB_HOST to use PostgreSQL")?;

    PgPoolOptions::new()
        .max_connections(db.max_connections)
        .acquire_timeout(db.acquire_timeout)
        .idle_timeout(db.idle_timeout)
        .max_lifetime(db.max_lifetime)
        .connect(&db.url)
        .await
        .with_context(|| format!("Could not connect to {}", db.redacted_url()))
}

/// Applies pending migrations from `./migrations`.
///
/// # Errors
///
/// Returns an error if any migration fails.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")
}

/// Wires the stores and services, then serves HTTP until a shutdown signal.
///
/// # Errors
///
/// Returns an error when the database is unreachable, a migration fails, or
/// the listener cannot bind.
pub async fn run(config: Config) -> Result<()> {
    let (links, tokens): (Arc<dyn ShortLinkRepository>, Arc<dyn TokenRepository>) =
        if config.is_persistent() {
            let pool = connect_pool(&config).await?;
            tracing::info!("Connected to database");

            migrate(&pool).await?;
            tracing::info!("Migrations applied");

            let pool = Arc::new(pool);
            (
                Arc::new(PgShortLinkRepository::new(pool.clone())),
                Arc::new(PgTokenRepository::new(pool)),
            )
        } else {
            tracing::warn!("No database configured, links are kept in memory only");
            (
                Arc::new(InMemoryShortLinkRepository::new()),
                Arc::new(InMemoryTokenRepository::new()),
            )
        };

    let state = AppState::from_repositories(
        links,
        tokens,
        config.token_signing_secret.clone(),
        config.key_max_attempts,
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
