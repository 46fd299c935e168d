use super::lock;
use crate::auth::{Authorizer, SessionClaims, SessionUser, SessionVerifier};
use async_trait::async_trait;
use axum::http::HeaderMap;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::collections::HashSet;
use std::sync::Mutex;
use tripdesk_core::AppError;
use tripdesk_db::AdminProfile;
use uuid::Uuid;

/// Secret the mock verifies sessions with.
pub const TEST_SESSION_SECRET: &str = "tripdesk-test-session-secret-0123456789";

/// Real session verification, in-memory admin profiles.
pub struct MockAuthorizer {
    verifier: SessionVerifier,
    admins: Mutex<HashSet<Uuid>>,
    profile_error: Mutex<Option<String>>,
}

impl Default for MockAuthorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAuthorizer {
    pub fn new() -> Self {
        Self {
            verifier: SessionVerifier::new(TEST_SESSION_SECRET),
            admins: Mutex::new(HashSet::new()),
            profile_error: Mutex::new(None),
        }
    }

    pub fn grant_admin(&self, user_id: Uuid) {
        lock(&self.admins).insert(user_id);
    }

    pub fn revoke_admin(&self, user_id: Uuid) {
        lock(&self.admins).remove(&user_id);
    }

    /// Make the next profile lookups fail as a database error would.
    pub fn fail_profile_lookup(&self, message: &str) {
        *lock(&self.profile_error) = Some(message.to_string());
    }

    /// A session token valid for one hour.
    pub fn token_for(user_id: Uuid) -> String {
        Self::token_with_expiry(user_id, chrono::Utc::now().timestamp() + 3600)
    }

    pub fn token_with_expiry(user_id: Uuid, exp: i64) -> String {
        let claims = SessionClaims {
            sub: user_id.to_string(),
            email: Some(format!("{}@tripdesk.test", user_id.simple())),
            role: Some("authenticated".to_string()),
            exp,
            iat: Some(chrono::Utc::now().timestamp()),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_SESSION_SECRET.as_bytes()),
        )
        .unwrap_or_default()
    }
}

#[async_trait]
impl Authorizer for MockAuthorizer {
    async fn current_user(&self, headers: &HeaderMap) -> Option<SessionUser> {
        self.verifier.current_user(headers)
    }

    async fn admin_profile(&self, user_id: Uuid) -> Result<Option<AdminProfile>, AppError> {
        if let Some(message) = lock(&self.profile_error).clone() {
            return Err(AppError::Internal(message));
        }
        if !lock(&self.admins).contains(&user_id) {
            return Ok(None);
        }
        Ok(Some(AdminProfile {
            user_id,
            email: Some(format!("{}@tripdesk.test", user_id.simple())),
            full_name: Some("Test Admin".to_string()),
            role: "admin".to_string(),
            created_at: chrono::Utc::now(),
        }))
    }
}
