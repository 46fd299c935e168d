//! Application state shared by every handler.

use crate::auth::Authorizer;
use crate::services::MediaReconciler;
use sqlx::PgPool;
use std::sync::Arc;
use tripdesk_core::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Used by the readiness probe. Catalog access goes through the reconciler.
    pub pool: PgPool,
    pub authorizer: Arc<dyn Authorizer>,
    pub reconciler: MediaReconciler,
}

impl AppState {
    pub fn new(
        config: Config,
        pool: PgPool,
        authorizer: Arc<dyn Authorizer>,
        reconciler: MediaReconciler,
    ) -> Self {
        Self {
            config,
            pool,
            authorizer,
            reconciler,
        }
    }
}
