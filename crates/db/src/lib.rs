//! Persistence for notification preferences, settings and the audit log.
//!
//! - [`store`] -- the [`NotificationStore`] and [`AuditSink`] seams.
//! - [`repositories`] -- Postgres implementations (sqlx).
//! - [`memory`] -- an in-process implementation for tests and local runs.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

pub use error::StoreError;
pub use memory::InMemoryStore;
pub use repositories::{PgAuditSink, PgNotificationStore};
pub use store::{AuditSink, NotificationStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
