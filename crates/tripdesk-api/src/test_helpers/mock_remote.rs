//! Mock remote asset store

use super::lock;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use tripdesk_core::ResourceKind;
use tripdesk_storage::{DestroyOutcome, RemoteAssetStore, StorageError, StorageResult};

/// Remote store answering from a per-kind script. Kinds without a scripted
/// answer report `Deleted`.
pub struct MockRemoteStore {
    configured: bool,
    responses: Mutex<HashMap<ResourceKind, StorageResult<DestroyOutcome>>>,
    calls: Mutex<Vec<(ResourceKind, String)>>,
}

impl Default for MockRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRemoteStore {
    pub fn new() -> Self {
        Self {
            configured: true,
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A store without credentials. Nothing is recorded because no request
    /// would ever be sent.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn respond(&self, kind: ResourceKind, response: StorageResult<DestroyOutcome>) {
        lock(&self.responses).insert(kind, response);
    }

    /// Destroy requests received, in order.
    pub fn calls(&self) -> Vec<(ResourceKind, String)> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl RemoteAssetStore for MockRemoteStore {
    async fn destroy(&self, kind: ResourceKind, key: &str) -> StorageResult<DestroyOutcome> {
        if !self.configured {
            return Err(StorageError::NotConfigured(
                "CDN credentials missing".to_string(),
            ));
        }

        lock(&self.calls).push((kind, key.to_string()));
        lock(&self.responses)
            .get(&kind)
            .cloned()
            .unwrap_or(Ok(DestroyOutcome::Deleted))
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
