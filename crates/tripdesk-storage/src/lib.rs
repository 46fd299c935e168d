//! Tripdesk Storage Library
//!
//! Remote asset store abstraction and the CDN admin API client behind it.
//!
//! # Remote keys
//!
//! The CDN files every object under a resource kind (`image`, `raw`, `video`)
//! and a key (its public id, e.g. `packages/bali/beach`). Deletes are addressed
//! by both; the same key may exist under more than one kind.

pub mod cdn;
pub mod factory;
pub mod signature;
pub mod traits;

// Re-export commonly used types
pub use cdn::CdnStorage;
pub use factory::create_remote_store;
pub use traits::{DestroyOutcome, RemoteAssetStore, StorageError, StorageResult};
pub use tripdesk_core::ResourceKind;
