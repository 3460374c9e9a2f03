/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Errors returned by [`crate::NotificationStore`] and [`crate::AuditSink`]
/// implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("Duplicate value violates unique constraint: {constraint}")]
    Duplicate { constraint: String },

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate { .. })
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return StoreError::Duplicate {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                };
            }
        }
        StoreError::Database(err)
    }
}
