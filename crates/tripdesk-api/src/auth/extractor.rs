use super::session::SessionUser;
use crate::error::HttpAppError;
use crate::middleware::audit;
use crate::state::AppState;
use crate::utils::ip_extraction::extract_client_ip;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use std::net::SocketAddr;
use std::sync::Arc;
use tripdesk_core::AppError;
use tripdesk_db::AdminProfile;

/// Authenticated administrator, resolved before the handler body runs.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub user: SessionUser,
    pub profile: AdminProfile,
    pub client_ip: String,
}

impl FromRequestParts<Arc<AppState>> for AdminContext {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let socket_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        let client_ip = extract_client_ip(
            &parts.headers,
            socket_addr.as_ref(),
            state.config.trusted_proxy_count,
        );

        let Some(user) = state.authorizer.current_user(&parts.headers).await else {
            audit::log_authentication_failure(Some(client_ip), "No valid session");
            return Err(AppError::Unauthorized("Unauthorized".to_string()).into());
        };

        let Some(profile) = state.authorizer.admin_profile(user.id).await? else {
            audit::log_access_denied(user.id, Some(client_ip), parts.uri.path());
            return Err(AppError::Forbidden("Forbidden".to_string()).into());
        };

        Ok(AdminContext {
            user,
            profile,
            client_ip,
        })
    }
}
