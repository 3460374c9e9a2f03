pub mod audit_repo;
pub mod notification_preference_repo;

pub use audit_repo::PgAuditSink;
pub use notification_preference_repo::PgNotificationStore;
