//! Remote asset store abstraction
//!
//! This module defines the trait every CDN backend implements.

use async_trait::async_trait;
use thiserror::Error;
use tripdesk_core::ResourceKind;

/// Remote store operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Credentials are missing; raised before any request is sent.
    #[error("Remote store not configured: {0}")]
    NotConfigured(String),

    #[error("Transport error: {0}")]
    Transport(String),

    /// The store answered with an explicit error.
    #[error("Remote store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid response from remote store: {0}")]
    InvalidResponse(String),

    #[error("Invalid remote key: {0}")]
    InvalidKey(String),
}

/// Result type for remote store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Non-error outcomes of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyOutcome {
    /// The object existed and is gone.
    Deleted,
    /// Nothing is stored under this kind and key.
    NotFound,
}

impl DestroyOutcome {
    /// Map the store's `result` string. Anything other than `ok` or
    /// `not found` is an error.
    pub fn from_result(result: &str) -> StorageResult<Self> {
        match result.trim() {
            "ok" => Ok(DestroyOutcome::Deleted),
            "not found" => Ok(DestroyOutcome::NotFound),
            other => Err(StorageError::InvalidResponse(format!(
                "unexpected destroy result '{}'",
                other
            ))),
        }
    }
}

/// Remote asset store abstraction trait
///
/// The reconciler only ever deletes, so that is all the trait exposes.
#[async_trait]
pub trait RemoteAssetStore: Send + Sync {
    /// Delete the object stored under `kind` and `key`.
    async fn destroy(&self, kind: ResourceKind, key: &str) -> StorageResult<DestroyOutcome>;

    /// Whether credentials are present. Unconfigured stores fail every destroy.
    fn is_configured(&self) -> bool;
}
