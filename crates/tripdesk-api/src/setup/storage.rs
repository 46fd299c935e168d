//! Remote asset store setup

use anyhow::{Context, Result};
use std::sync::Arc;
use tripdesk_core::Config;
use tripdesk_storage::{create_remote_store, RemoteAssetStore};

pub fn setup_remote_store(config: &Config) -> Result<Arc<dyn RemoteAssetStore>> {
    tracing::info!("Initializing remote asset store...");
    let store = create_remote_store(config).context("Failed to create CDN client")?;
    tracing::info!(
        configured = store.is_configured(),
        base_url = %config.cdn_api_base_url,
        "Remote asset store initialized"
    );
    Ok(store)
}
