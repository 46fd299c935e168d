//! Back office route groups.

use crate::constants::ADMIN_API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::delete;
use axum::Router;
use std::sync::Arc;

/// Admin routes. Authorization happens in the `AdminContext` extractor of
/// each handler, so no auth layer is applied here.
pub fn admin_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/media/{{id}}", ADMIN_API_PREFIX),
            delete(handlers::delete_media),
        )
        .with_state(state)
}
