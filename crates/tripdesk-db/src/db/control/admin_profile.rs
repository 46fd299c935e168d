use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Postgres};
use tripdesk_core::AppError;
use uuid::Uuid;

/// Back office access grant for an identity-provider user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct AdminProfile {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AdminProfileRepository {
    pool: PgPool,
}

impl AdminProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the admin profile of a user, if any.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<AdminProfile>, AppError> {
        let profile = sqlx::query_as::<Postgres, AdminProfile>(
            r#"
            SELECT user_id, email, full_name, role, created_at
            FROM admin_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}
