use super::{CollectionRow, ContentCatalog};
use crate::db::error::CatalogResult;
use crate::db::schema::CatalogCapabilities;
use sqlx::{PgPool, Postgres};
use tripdesk_core::{Cardinality, MediaAsset, MediaType, ReferenceSite};

#[derive(Debug, sqlx::FromRow)]
struct MediaRow {
    id: String,
    url: String,
    media_type: Option<String>,
    public_id: Option<String>,
}

impl From<MediaRow> for MediaAsset {
    fn from(row: MediaRow) -> Self {
        MediaAsset {
            id: row.id,
            url: row.url,
            public_id: row.public_id,
            media_type: MediaType::from_column(row.media_type.as_deref()),
        }
    }
}

/// Content catalog backed by the hosted Postgres database
///
/// Media ids are compared as text so the catalog works whether the primary
/// keys are UUIDs or integers.
#[derive(Clone)]
pub struct PgContentCatalog {
    pool: PgPool,
    capabilities: CatalogCapabilities,
}

impl PgContentCatalog {
    pub fn new(pool: PgPool, capabilities: CatalogCapabilities) -> Self {
        Self { pool, capabilities }
    }

    pub fn capabilities(&self) -> &CatalogCapabilities {
        &self.capabilities
    }

    fn media_query(with_public_id: bool) -> &'static str {
        if with_public_id {
            "SELECT id::text AS id, url, type::text AS media_type, public_id \
             FROM media WHERE id::text = $1"
        } else {
            "SELECT id::text AS id, url, type::text AS media_type, NULL::text AS public_id \
             FROM media WHERE id::text = $1"
        }
    }

    /// Containment (`@>`) rather than `= ANY` so the GIN index on the
    /// collection column can be used.
    fn rows_containing_query(site: &ReferenceSite) -> String {
        format!(
            "SELECT id::text AS id, {field} AS entries FROM {table} \
             WHERE {field} @> ARRAY[$1]::text[]",
            table = site.table,
            field = site.field
        )
    }
}

#[async_trait::async_trait]
impl ContentCatalog for PgContentCatalog {
    fn has_public_id(&self) -> bool {
        self.capabilities.media_public_id
    }

    async fn find_media(
        &self,
        id: &str,
        with_public_id: bool,
    ) -> CatalogResult<Option<MediaAsset>> {
        let row = sqlx::query_as::<Postgres, MediaRow>(Self::media_query(with_public_id))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(MediaAsset::from))
    }

    async fn clear_scalar(&self, site: &ReferenceSite, url: &str) -> CatalogResult<u64> {
        debug_assert_eq!(site.cardinality, Cardinality::Scalar);
        let sql = format!(
            "UPDATE {table} SET {field} = NULL WHERE {field} = $1",
            table = site.table,
            field = site.field
        );
        let result = sqlx::query(&sql).bind(url).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn rows_containing(
        &self,
        site: &ReferenceSite,
        url: &str,
    ) -> CatalogResult<Vec<CollectionRow>> {
        debug_assert_eq!(site.cardinality, Cardinality::Collection);
        let sql = Self::rows_containing_query(site);
        let rows = sqlx::query_as::<Postgres, CollectionRow>(&sql)
            .bind(url)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn write_collection(
        &self,
        site: &ReferenceSite,
        row_id: &str,
        entries: &[String],
    ) -> CatalogResult<()> {
        let sql = format!(
            "UPDATE {table} SET {field} = $1 WHERE id::text = $2",
            table = site.table,
            field = site.field
        );
        sqlx::query(&sql)
            .bind(entries)
            .bind(row_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_media(&self, id: &str) -> CatalogResult<u64> {
        let result = sqlx::query("DELETE FROM media WHERE id::text = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
