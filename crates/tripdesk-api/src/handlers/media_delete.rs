use crate::auth::AdminContext;
use crate::error::HttpAppError;
use crate::middleware::audit;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tripdesk_core::{AppError, CleanupFailure, RemovalReport};

#[derive(Debug, Serialize)]
pub struct MediaDeleteResponse {
    pub ok: bool,
    /// Rows changed per reference site. Every site is present; failed sites report 0.
    pub removed: BTreeMap<&'static str, u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cleanup_errors: Vec<CleanupFailure>,
}

impl From<&RemovalReport> for MediaDeleteResponse {
    fn from(report: &RemovalReport) -> Self {
        Self {
            ok: true,
            removed: report.removed(),
            cleanup_errors: report.failures(),
        }
    }
}

/// Delete a media asset from the CDN, scrub its URL from the content tables
/// and drop its catalog row.
#[tracing::instrument(
    skip(state, admin),
    fields(
        user_id = %admin.user.id,
        media_id = %id,
        operation = "delete_media"
    )
)]
pub async fn delete_media(
    admin: AdminContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MediaDeleteResponse>, HttpAppError> {
    let id = id.trim().to_string();
    if id.is_empty() {
        return Err(AppError::InvalidInput("Media id must not be empty".to_string()).into());
    }

    match state.reconciler.reconcile_delete(&id).await {
        Ok(report) => {
            if report.has_failures() {
                tracing::warn!(
                    failed_sites = report.failures().len(),
                    "Media deleted with reference cleanup errors"
                );
            }
            audit::log_media_deleted(Some(admin.user.id), &id, Some(admin.client_ip), &report);
            Ok(Json(MediaDeleteResponse::from(&report)))
        }
        Err(e) => {
            audit::log_media_delete_failed(
                Some(admin.user.id),
                &id,
                Some(admin.client_ip),
                &e.to_string(),
            );
            Err(e.into())
        }
    }
}
