use tripdesk_core::AppError;

/// SQLSTATE for `undefined_column`.
const UNDEFINED_COLUMN: &str = "42703";

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A queried column does not exist in the current schema. Callers that
    /// know an older schema may retry without the column.
    #[error("Column missing: {0}")]
    ColumnMissing(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

/// Postgres reports a missing column as SQLSTATE 42703; proxies in front of
/// the catalog sometimes only forward the message.
fn is_column_missing(code: Option<&str>, message: &str) -> bool {
    code == Some(UNDEFINED_COLUMN)
        || (message.starts_with("column ") && message.ends_with("does not exist"))
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if is_column_missing(db_err.code().as_deref(), db_err.message()) {
                return CatalogError::ColumnMissing(db_err.message().to_string());
            }
        }
        CatalogError::Database(err)
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ColumnMissing(msg) => {
                AppError::Internal(format!("Catalog schema mismatch: {}", msg))
            }
            CatalogError::Database(e) => AppError::Database(e),
        }
    }
}
