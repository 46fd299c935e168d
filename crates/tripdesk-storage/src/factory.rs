use crate::{CdnStorage, RemoteAssetStore, StorageResult};
use std::sync::Arc;
use std::time::Duration;
use tripdesk_core::Config;

/// Create the remote asset store from configuration.
///
/// Missing CDN credentials are logged, not rejected: the back office still
/// serves everything else, and remote deletes fail cleanly.
pub fn create_remote_store(config: &Config) -> StorageResult<Arc<dyn RemoteAssetStore>> {
    if config.cdn_credentials.is_none() {
        tracing::warn!("CDN credentials not configured; media deletes will fail until they are set");
    }

    let store = CdnStorage::new(
        config.cdn_api_base_url.clone(),
        config.cdn_credentials.clone(),
        config.cdn_signature_algorithm,
        Duration::from_secs(config.cdn_timeout_seconds),
    )?;
    Ok(Arc::new(store))
}
