//! Tripdesk operator CLI.
//!
//! Reads the same environment as the API server (DATABASE_URL, CDN_* and
//! friends, `.env` honoured) and talks to the catalog and the CDN directly.

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tripdesk_api::services::MediaReconciler;
use tripdesk_api::setup::database::probe_schema;
use tripdesk_cli::{format_report_table, init_tracing, print_json, report_json, OutputFormat};
use tripdesk_core::{resolve_remote_key, resource_kind_preferences, Config, MediaAsset, MediaType};
use tripdesk_db::PgContentCatalog;
use tripdesk_storage::create_remote_store;

#[derive(Parser)]
#[command(name = "tripdesk", about = "Tripdesk back office operator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete a media asset from the CDN, its references and the catalog
    DeleteMedia {
        /// Media ID
        id: String,
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Show which CDN key and resource kinds a delete would use
    ResolveKey {
        /// Delivery URL of the asset
        #[arg(long)]
        url: String,
        /// Stored public id, if the catalog has one
        #[arg(long)]
        public_id: Option<String>,
        /// Catalog media type: image, pdf or video
        #[arg(long, default_value = "image")]
        r#type: String,
    },
    /// Report which optional catalog columns exist
    ProbeSchema,
}

async fn connect(config: &Config) -> anyhow::Result<sqlx::PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::DeleteMedia { id, format } => {
            let config = Config::from_env().context("Failed to load configuration")?;
            let pool = connect(&config).await?;
            let capabilities = probe_schema(&pool).await;
            let remote = create_remote_store(&config).context("Failed to create CDN client")?;
            let catalog = Arc::new(PgContentCatalog::new(pool, capabilities));
            let reconciler = MediaReconciler::new(catalog, remote, config.cleanup_concurrency);

            let report = reconciler.reconcile_delete(&id).await?;
            match format {
                OutputFormat::Json => print_json(&report_json(&report))?,
                OutputFormat::Table => print!("{}", format_report_table(&id, &report)),
            }
        }
        Commands::ResolveKey {
            url,
            public_id,
            r#type,
        } => {
            let media_type = MediaType::from_column(Some(&r#type));
            let asset = MediaAsset {
                id: String::new(),
                url,
                public_id,
                media_type,
            };
            let kinds: Vec<&str> = resource_kind_preferences(media_type)
                .iter()
                .map(|k| k.as_str())
                .collect();
            print_json(&serde_json::json!({
                "media_type": media_type,
                "remote_key": resolve_remote_key(&asset),
                "resource_kinds": kinds,
            }))?;
        }
        Commands::ProbeSchema => {
            dotenvy::dotenv().ok();
            let database_url =
                std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
            let pool = PgPoolOptions::new()
                .max_connections(1)
                .connect(&database_url)
                .await
                .context("Failed to connect to database")?;
            let capabilities = tripdesk_db::probe_capabilities(&pool).await?;
            print_json(&capabilities)?;
        }
    }

    Ok(())
}
