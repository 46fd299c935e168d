//! Startup schema probe
//!
//! Older catalogs predate `media.public_id`, and some deployments never
//! created every content table. Learning this once at startup keeps the
//! request path free of error-message sniffing.

use super::error::CatalogResult;
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashSet;
use tripdesk_core::REFERENCE_SITES;

/// What the connected catalog schema supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogCapabilities {
    /// `media.public_id` exists
    pub media_public_id: bool,
    /// Keys of reference sites whose table or column is absent. Cleanup for
    /// these sites will fail and be reported per site.
    pub missing_reference_sites: Vec<&'static str>,
}

impl Default for CatalogCapabilities {
    /// Assume the current schema.
    fn default() -> Self {
        Self {
            media_public_id: true,
            missing_reference_sites: Vec::new(),
        }
    }
}

impl CatalogCapabilities {
    fn from_columns(columns: &HashSet<(String, String)>) -> Self {
        let has = |table: &str, column: &str| {
            columns.contains(&(table.to_string(), column.to_string()))
        };

        Self {
            media_public_id: has("media", "public_id"),
            missing_reference_sites: REFERENCE_SITES
                .iter()
                .filter(|site| !has(site.table, site.field))
                .map(|site| site.key)
                .collect(),
        }
    }
}

/// Read `information_schema.columns` for the tables the reconciler touches.
pub async fn probe_capabilities(pool: &PgPool) -> CatalogResult<CatalogCapabilities> {
    let tables: Vec<&str> = std::iter::once("media")
        .chain(REFERENCE_SITES.iter().map(|s| s.table))
        .collect();

    let rows: Vec<(String, String)> = sqlx::query_as(
        r#"
        SELECT table_name::text, column_name::text
        FROM information_schema.columns
        WHERE table_schema = current_schema()
          AND table_name = ANY($1)
        "#,
    )
    .bind(&tables)
    .fetch_all(pool)
    .await?;

    let capabilities = CatalogCapabilities::from_columns(&rows.into_iter().collect());

    if !capabilities.media_public_id {
        tracing::warn!("media.public_id column not found; remote keys will be parsed from URLs");
    }
    if !capabilities.missing_reference_sites.is_empty() {
        tracing::warn!(
            sites = ?capabilities.missing_reference_sites,
            "Some reference sites are missing from the catalog schema"
        );
    }

    Ok(capabilities)
}
