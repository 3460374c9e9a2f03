//! Storage seams used by the API layer.
//!
//! Both traits are object-safe so the application state can hold
//! `Arc<dyn NotificationStore>` and swap Postgres for the in-memory store.

use async_trait::async_trait;
use threesixty_core::notification_settings::SettingsUpdate;
use threesixty_core::preferences::PreferenceChange;

use crate::error::StoreError;
use crate::models::audit::CreateAuditLog;
use crate::models::notification::{
    NewNotificationSettings, NotificationPreference, UserNotificationSettings,
};

#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Every preference row for `user_id`.
    async fn list_preferences(
        &self,
        user_id: &str,
    ) -> Result<Vec<NotificationPreference>, StoreError>;

    /// Insert rows that do not exist yet; existing rows are left alone.
    ///
    /// Returns the number of rows actually inserted.
    async fn insert_missing_preferences(
        &self,
        user_id: &str,
        rows: &[PreferenceChange],
    ) -> Result<u64, StoreError>;

    /// Insert or overwrite rows, bumping `updated_at`.
    async fn upsert_preferences(
        &self,
        user_id: &str,
        rows: &[PreferenceChange],
    ) -> Result<Vec<NotificationPreference>, StoreError>;

    async fn find_settings(
        &self,
        user_id: &str,
    ) -> Result<Option<UserNotificationSettings>, StoreError>;

    /// Insert a settings row. Fails with [`StoreError::Duplicate`] when the
    /// user already has one.
    async fn insert_settings(
        &self,
        user_id: &str,
        values: &NewNotificationSettings,
    ) -> Result<UserNotificationSettings, StoreError>;

    /// Apply `update` to an existing row. `None` when the user has no row.
    async fn update_settings(
        &self,
        user_id: &str,
        update: &SettingsUpdate,
    ) -> Result<Option<UserNotificationSettings>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Destination for audit entries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: &CreateAuditLog) -> Result<(), StoreError>;
}
