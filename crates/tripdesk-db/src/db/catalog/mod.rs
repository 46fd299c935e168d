mod postgres;

pub use postgres::PgContentCatalog;

use super::error::CatalogResult;
use tripdesk_core::{MediaAsset, ReferenceSite};

/// A content row holding a collection field that contains a media URL.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CollectionRow {
    pub id: String,
    pub entries: Vec<String>,
}

/// Trait for catalog operations used by media reconciliation
///
/// Table and field names always come from a [`ReferenceSite`]; callers never
/// pass free-form identifiers.
#[async_trait::async_trait]
pub trait ContentCatalog: Send + Sync {
    /// Whether `media.public_id` is expected to exist. Lookups should request
    /// the column only when this is true.
    fn has_public_id(&self) -> bool {
        true
    }

    /// Read a media row by id. `with_public_id = false` omits the column and
    /// returns the asset with `public_id: None`.
    async fn find_media(&self, id: &str, with_public_id: bool)
        -> CatalogResult<Option<MediaAsset>>;

    /// Set a scalar field to NULL wherever it equals `url`. Returns rows changed.
    async fn clear_scalar(&self, site: &ReferenceSite, url: &str) -> CatalogResult<u64>;

    /// Rows whose collection field contains `url`.
    async fn rows_containing(
        &self,
        site: &ReferenceSite,
        url: &str,
    ) -> CatalogResult<Vec<CollectionRow>>;

    /// Overwrite the collection field of one row.
    async fn write_collection(
        &self,
        site: &ReferenceSite,
        row_id: &str,
        entries: &[String],
    ) -> CatalogResult<()>;

    /// Delete the media row. Returns rows deleted.
    async fn delete_media(&self, id: &str) -> CatalogResult<u64>;
}
