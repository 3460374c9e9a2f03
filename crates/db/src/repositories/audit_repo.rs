//! Postgres sink for the `audit_logs` table.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::audit::CreateAuditLog;
use crate::store::AuditSink;
use crate::DbPool;

/// [`AuditSink`] that appends to `audit_logs`.
#[derive(Clone)]
pub struct PgAuditSink {
    pool: DbPool,
}

impl PgAuditSink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PgAuditSink {
    async fn record(&self, entry: &CreateAuditLog) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO audit_logs (event_type, user_id, email, status, metadata) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&entry.event_type)
        .bind(&entry.user_id)
        .bind(&entry.email)
        .bind(&entry.status)
        .bind(&entry.metadata)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
