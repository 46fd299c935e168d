//! Data models for the back office
//!
//! Media catalog rows, the fixed table of places a media URL can be referenced
//! from, and the outcome of a reconciliation.

mod media;
mod reference;
mod removal;

pub use media::{MediaAsset, MediaType, ResourceKind};
pub use reference::{without_url, Cardinality, ReferenceSite, REFERENCE_SITES};
pub use removal::{CleanupFailure, RemovalReport, SiteOutcome};
