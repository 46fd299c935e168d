//! Application setup and initialization
//!
//! Everything `main` needs to go from a `Config` to a running router, kept
//! out of main.rs so tests and the CLI can reuse the wiring.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::auth::{SessionAuthorizer, SessionVerifier};
use crate::services::MediaReconciler;
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tripdesk_core::Config;
use tripdesk_db::{AdminProfileRepository, PgContentCatalog};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(&config.environment)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;
    let capabilities = database::probe_schema(&pool).await;

    let remote = storage::setup_remote_store(&config)?;

    let catalog = Arc::new(PgContentCatalog::new(pool.clone(), capabilities));
    let reconciler = MediaReconciler::new(catalog, remote, config.cleanup_concurrency);

    let authorizer = Arc::new(SessionAuthorizer::new(
        SessionVerifier::new(&config.session_jwt_secret),
        AdminProfileRepository::new(pool.clone()),
    ));

    let state = Arc::new(AppState::new(config.clone(), pool, authorizer, reconciler));

    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}
