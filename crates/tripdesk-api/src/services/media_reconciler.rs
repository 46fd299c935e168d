//! Media deletion reconciliation
//!
//! Deleting a media asset touches three systems that share no transaction:
//! the CDN holding the bytes, the content tables that embed the delivery URL,
//! and the catalog row itself. The order below keeps every failure before the
//! catalog delete safe to retry:
//!
//! 1. look the asset up (falling back to a schema without `public_id`)
//! 2. resolve the remote key from `public_id` or the delivery URL
//! 3. delete the remote object, trying each plausible resource kind
//! 4. scrub the URL from every reference site, concurrently and best-effort
//! 5. delete the catalog row
//!
//! Steps 1 to 3 abort on error. Step 4 never aborts; per-site failures are
//! returned in the [`RemovalReport`]. A failure in step 5 leaves an orphaned
//! catalog row whose remote object is already gone; running the delete again
//! finishes the job because a missing remote object counts as deleted.

use futures::future::join_all;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tripdesk_core::{
    resolve_remote_key, resource_kind_preferences, without_url, AppError, Cardinality,
    MediaAsset, ReferenceSite, RemovalReport, SiteOutcome, REFERENCE_SITES,
};
use tripdesk_db::{CatalogError, ContentCatalog};
use tripdesk_storage::{DestroyOutcome, RemoteAssetStore};

#[derive(Clone)]
pub struct MediaReconciler {
    catalog: Arc<dyn ContentCatalog>,
    remote: Arc<dyn RemoteAssetStore>,
    cleanup_concurrency: usize,
}

impl MediaReconciler {
    pub fn new(
        catalog: Arc<dyn ContentCatalog>,
        remote: Arc<dyn RemoteAssetStore>,
        cleanup_concurrency: usize,
    ) -> Self {
        Self {
            catalog,
            remote,
            cleanup_concurrency: cleanup_concurrency.max(1),
        }
    }

    /// Delete a media asset everywhere it lives.
    #[tracing::instrument(skip(self), fields(operation = "reconcile_delete"))]
    pub async fn reconcile_delete(&self, media_id: &str) -> Result<RemovalReport, AppError> {
        let asset = self.lookup(media_id).await?;

        match resolve_remote_key(&asset) {
            Some(key) => self.delete_remote(&asset, &key).await?,
            None => tracing::info!(
                url = %asset.url,
                "No remote key derivable from URL, skipping remote delete"
            ),
        }

        let report = self.cleanup_references(&asset.url).await;

        match self.catalog.delete_media(&asset.id).await {
            Ok(0) => tracing::warn!("Media row was already gone at catalog delete"),
            Ok(_) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Catalog delete failed after remote delete and reference cleanup; media row is orphaned"
                );
                return Err(AppError::CatalogDeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            removed = report.total_removed(),
            cleanup_failures = report.failures().len(),
            "Media reconciled"
        );
        Ok(report)
    }

    async fn lookup(&self, media_id: &str) -> Result<MediaAsset, AppError> {
        let with_public_id = self.catalog.has_public_id();

        let found = match self.catalog.find_media(media_id, with_public_id).await {
            Err(CatalogError::ColumnMissing(msg)) if with_public_id => {
                tracing::warn!(
                    error = %msg,
                    "media.public_id missing, retrying lookup without it"
                );
                self.catalog.find_media(media_id, false).await
            }
            other => other,
        }?;

        found.ok_or_else(|| AppError::NotFound("Media not found".to_string()))
    }

    /// Try each plausible resource kind until one confirms the delete. A key
    /// that no kind knows about is already gone.
    async fn delete_remote(&self, asset: &MediaAsset, key: &str) -> Result<(), AppError> {
        for kind in resource_kind_preferences(asset.media_type) {
            tracing::debug!(kind = %kind, key = %key, "Requesting remote delete");
            match self.remote.destroy(*kind, key).await {
                Ok(DestroyOutcome::Deleted) => {
                    tracing::info!(kind = %kind, key = %key, "Remote object deleted");
                    return Ok(());
                }
                Ok(DestroyOutcome::NotFound) => continue,
                Err(e) => {
                    tracing::error!(kind = %kind, key = %key, error = %e, "Remote delete failed");
                    return Err(AppError::RemoteDeleteFailed(e.to_string()));
                }
            }
        }

        tracing::info!(key = %key, "Remote object not found under any kind, treating as deleted");
        Ok(())
    }

    /// Remove `url` from every reference site. All sites run concurrently and
    /// a failing site never stops the others.
    pub async fn cleanup_references(&self, url: &str) -> RemovalReport {
        let outcomes = join_all(
            REFERENCE_SITES
                .iter()
                .map(|site| self.cleanup_site(site, url)),
        )
        .await;
        RemovalReport::new(outcomes)
    }

    async fn cleanup_site(&self, site: &ReferenceSite, url: &str) -> SiteOutcome {
        let result = match site.cardinality {
            Cardinality::Scalar => self
                .catalog
                .clear_scalar(site, url)
                .await
                .map_err(|e| e.to_string()),
            Cardinality::Collection => self.cleanup_collection(site, url).await,
        };

        match result {
            Ok(rows) => {
                if rows > 0 {
                    tracing::debug!(site = site.key, rows, "Reference site cleaned");
                }
                SiteOutcome::cleaned(*site, rows)
            }
            Err(reason) => {
                tracing::warn!(site = site.key, error = %reason, "Reference cleanup failed");
                SiteOutcome::failed(*site, reason)
            }
        }
    }

    /// Rewrite every row whose collection holds `url`. Rows are independent,
    /// so the writes run concurrently up to the configured limit.
    async fn cleanup_collection(&self, site: &ReferenceSite, url: &str) -> Result<u64, String> {
        let rows = self
            .catalog
            .rows_containing(site, url)
            .await
            .map_err(|e| e.to_string())?;

        let rewrites: Vec<(String, Vec<String>)> = rows
            .into_iter()
            .filter_map(|row| without_url(&row.entries, url).map(|kept| (row.id, kept)))
            .collect();
        let attempted = rewrites.len();

        let results: Vec<Result<(), CatalogError>> = stream::iter(rewrites)
            .map(|(row_id, kept)| async move {
                self.catalog.write_collection(site, &row_id, &kept).await
            })
            .buffer_unordered(self.cleanup_concurrency)
            .collect()
            .await;

        let mut changed = 0u64;
        let mut first_error = None;
        for result in results {
            match result {
                Ok(()) => changed += 1,
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            None => Ok(changed),
            Some(e) => Err(format!(
                "{} of {} rows rewritten; {}",
                changed, attempted, e
            )),
        }
    }
}
