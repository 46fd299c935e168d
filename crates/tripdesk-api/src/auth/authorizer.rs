use super::session::{SessionUser, SessionVerifier};
use async_trait::async_trait;
use axum::http::HeaderMap;
use tripdesk_core::AppError;
use tripdesk_db::{AdminProfile, AdminProfileRepository};
use uuid::Uuid;

/// Who is calling, and may they administer the back office?
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// The signed-in user, or `None` without a valid session.
    async fn current_user(&self, headers: &HeaderMap) -> Option<SessionUser>;

    /// The user's admin profile, or `None` when they are not an administrator.
    async fn admin_profile(&self, user_id: Uuid) -> Result<Option<AdminProfile>, AppError>;
}

/// Session tokens checked against the identity provider's secret, admin
/// profiles read from the catalog.
pub struct SessionAuthorizer {
    verifier: SessionVerifier,
    profiles: AdminProfileRepository,
}

impl SessionAuthorizer {
    pub fn new(verifier: SessionVerifier, profiles: AdminProfileRepository) -> Self {
        Self { verifier, profiles }
    }
}

#[async_trait]
impl Authorizer for SessionAuthorizer {
    async fn current_user(&self, headers: &HeaderMap) -> Option<SessionUser> {
        self.verifier.current_user(headers)
    }

    async fn admin_profile(&self, user_id: Uuid) -> Result<Option<AdminProfile>, AppError> {
        self.profiles.find_by_user_id(user_id).await
    }
}
