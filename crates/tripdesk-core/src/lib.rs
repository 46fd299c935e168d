//! Tripdesk Core Library
//!
//! Domain models, error types, configuration and remote-key resolution shared
//! by the back office API, the catalog layer and the operator CLI.

pub mod config;
pub mod error;
pub mod models;
pub mod remote_key;

// Re-export commonly used types
pub use config::{CdnCredentials, Config, SignatureAlgorithm};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    without_url, Cardinality, CleanupFailure, MediaAsset, MediaType, ReferenceSite, RemovalReport,
    ResourceKind, SiteOutcome, REFERENCE_SITES,
};
pub use remote_key::{parse_public_id_from_url, resolve_remote_key, resource_kind_preferences};
