//! Audit log entity and insert DTO.
//!
//! Audit entries have no `updated_at` field (immutable records).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use threesixty_core::types::{DbId, Timestamp};

/// A row from the `audit_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub event_type: String,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub status: String,
    pub metadata: serde_json::Value,
    pub created_at: Timestamp,
}

/// DTO for appending an audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAuditLog {
    pub event_type: String,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub status: String,
    pub metadata: serde_json::Value,
}
