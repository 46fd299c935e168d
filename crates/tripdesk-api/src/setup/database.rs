//! Database setup and initialization

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::time::Duration;
use tripdesk_core::Config;
use tripdesk_db::{probe_capabilities, CatalogCapabilities};

/// Setup database connection pool and run migrations
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connected successfully"
    );

    if !config.run_migrations {
        tracing::info!("RUN_MIGRATIONS=false, leaving the catalog schema as is");
        return Ok(pool);
    }

    // Run pending migrations on startup (path: workspace migrations/ from crate root)
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

/// Learn which optional catalog columns exist.
///
/// A failed probe is not fatal: the full schema is assumed and a missing
/// column is still caught per lookup.
pub async fn probe_schema(pool: &PgPool) -> CatalogCapabilities {
    match probe_capabilities(pool).await {
        Ok(capabilities) => {
            tracing::info!(
                media_public_id = capabilities.media_public_id,
                missing_reference_sites = ?capabilities.missing_reference_sites,
                "Catalog schema probed"
            );
            capabilities
        }
        Err(e) => {
            tracing::warn!(error = %e, "Catalog schema probe failed, assuming full schema");
            CatalogCapabilities::default()
        }
    }
}
