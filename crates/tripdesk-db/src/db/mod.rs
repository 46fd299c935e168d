//! Database repositories
//!
//! catalog/ covers media rows and the content tables that reference them,
//! control/ covers back office access (admin profiles).
//
// Media catalog and reference sites
pub mod catalog;
//
// Back office access
pub mod control;
//
// Typed catalog errors
pub mod error;
//
// Startup schema probe
pub mod schema;

pub use catalog::{CollectionRow, ContentCatalog, PgContentCatalog};
pub use control::{AdminProfile, AdminProfileRepository};
pub use error::{CatalogError, CatalogResult};
pub use schema::{probe_capabilities, CatalogCapabilities};
