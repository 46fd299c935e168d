//! Catalog access for the back office
//!
//! The hosted Postgres database holds both the media catalog and the content
//! tables that reference media URLs.

pub mod db;

pub use db::{
    probe_capabilities, AdminProfile, AdminProfileRepository, CatalogCapabilities, CatalogError,
    CatalogResult, CollectionRow, ContentCatalog, PgContentCatalog,
};
