//! In-process [`NotificationStore`] and [`AuditSink`].
//!
//! Mirrors the Postgres semantics that matter to callers: the
//! (user, category, channel) and (user) uniqueness constraints, insert-if-
//! absent versus overwrite, and `Duplicate` on a second settings insert.
//! Used by the integration tests and when no `DATABASE_URL` is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use threesixty_core::notification_settings::SettingsUpdate;
use threesixty_core::preferences::PreferenceChange;
use threesixty_core::types::DbId;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::audit::{AuditLog, CreateAuditLog};
use crate::models::notification::{
    NewNotificationSettings, NotificationPreference, UserNotificationSettings,
};
use crate::store::{AuditSink, NotificationStore};

type PreferenceKey = (String, &'static str, &'static str);

#[derive(Default)]
struct Tables {
    next_id: DbId,
    preferences: HashMap<PreferenceKey, NotificationPreference>,
    settings: HashMap<String, UserNotificationSettings>,
    audit_logs: Vec<AuditLog>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of preference rows across all users.
    pub async fn preference_count(&self) -> usize {
        self.tables.read().await.preferences.len()
    }

    /// Number of settings rows across all users.
    pub async fn settings_count(&self) -> usize {
        self.tables.read().await.settings.len()
    }

    /// Audit entries in insertion order.
    pub async fn audit_logs(&self) -> Vec<AuditLog> {
        self.tables.read().await.audit_logs.clone()
    }
}

fn key(user_id: &str, change: &PreferenceChange) -> PreferenceKey {
    (
        user_id.to_string(),
        change.category.as_str(),
        change.channel.as_str(),
    )
}

#[async_trait]
impl NotificationStore for InMemoryStore {
    async fn list_preferences(
        &self,
        user_id: &str,
    ) -> Result<Vec<NotificationPreference>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<NotificationPreference> = tables
            .preferences
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (&a.category, &a.channel).cmp(&(&b.category, &b.channel)));
        Ok(rows)
    }

    async fn insert_missing_preferences(
        &self,
        user_id: &str,
        rows: &[PreferenceChange],
    ) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        let mut inserted = 0;
        for change in rows {
            let k = key(user_id, change);
            if tables.preferences.contains_key(&k) {
                continue;
            }
            let now = chrono::Utc::now();
            let id = tables.next_id();
            tables.preferences.insert(
                k,
                NotificationPreference {
                    id,
                    user_id: user_id.to_string(),
                    category: change.category.as_str().to_string(),
                    channel: change.channel.as_str().to_string(),
                    enabled: change.enabled,
                    created_at: now,
                    updated_at: now,
                },
            );
            inserted += 1;
        }
        Ok(inserted)
    }

    async fn upsert_preferences(
        &self,
        user_id: &str,
        rows: &[PreferenceChange],
    ) -> Result<Vec<NotificationPreference>, StoreError> {
        let mut tables = self.tables.write().await;
        let mut written = Vec::with_capacity(rows.len());
        for change in rows {
            let now = chrono::Utc::now();
            let k = key(user_id, change);
            let row = match tables.preferences.get_mut(&k) {
                Some(existing) => {
                    existing.enabled = change.enabled;
                    existing.updated_at = now;
                    existing.clone()
                }
                None => {
                    let id = tables.next_id();
                    let row = NotificationPreference {
                        id,
                        user_id: user_id.to_string(),
                        category: change.category.as_str().to_string(),
                        channel: change.channel.as_str().to_string(),
                        enabled: change.enabled,
                        created_at: now,
                        updated_at: now,
                    };
                    tables.preferences.insert(k, row.clone());
                    row
                }
            };
            written.push(row);
        }
        Ok(written)
    }

    async fn find_settings(
        &self,
        user_id: &str,
    ) -> Result<Option<UserNotificationSettings>, StoreError> {
        Ok(self.tables.read().await.settings.get(user_id).cloned())
    }

    async fn insert_settings(
        &self,
        user_id: &str,
        values: &NewNotificationSettings,
    ) -> Result<UserNotificationSettings, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.settings.contains_key(user_id) {
            return Err(StoreError::Duplicate {
                constraint: "uq_user_notification_settings_user".to_string(),
            });
        }
        let now = chrono::Utc::now();
        let id = tables.next_id();
        let row = UserNotificationSettings {
            id,
            user_id: user_id.to_string(),
            email_notifications_enabled: values.email_notifications_enabled,
            push_notifications_enabled: values.push_notifications_enabled,
            in_app_notifications_enabled: values.in_app_notifications_enabled,
            quiet_hours_start: values.quiet_hours_start.clone(),
            quiet_hours_end: values.quiet_hours_end.clone(),
            quiet_hours_timezone: values.quiet_hours_timezone.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.settings.insert(user_id.to_string(), row.clone());
        Ok(row)
    }

    async fn update_settings(
        &self,
        user_id: &str,
        update: &SettingsUpdate,
    ) -> Result<Option<UserNotificationSettings>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.settings.get_mut(user_id) else {
            return Ok(None);
        };

        let mut values = NewNotificationSettings {
            email_notifications_enabled: row.email_notifications_enabled,
            push_notifications_enabled: row.push_notifications_enabled,
            in_app_notifications_enabled: row.in_app_notifications_enabled,
            quiet_hours_start: row.quiet_hours_start.clone(),
            quiet_hours_end: row.quiet_hours_end.clone(),
            quiet_hours_timezone: row.quiet_hours_timezone.clone(),
        };
        values.apply(update);

        row.email_notifications_enabled = values.email_notifications_enabled;
        row.push_notifications_enabled = values.push_notifications_enabled;
        row.in_app_notifications_enabled = values.in_app_notifications_enabled;
        row.quiet_hours_start = values.quiet_hours_start;
        row.quiet_hours_end = values.quiet_hours_end;
        row.quiet_hours_timezone = values.quiet_hours_timezone;
        row.updated_at = chrono::Utc::now();
        Ok(Some(row.clone()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl AuditSink for InMemoryStore {
    async fn record(&self, entry: &CreateAuditLog) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        tables.audit_logs.push(AuditLog {
            id,
            event_type: entry.event_type.clone(),
            user_id: entry.user_id.clone(),
            email: entry.email.clone(),
            status: entry.status.clone(),
            metadata: entry.metadata.clone(),
            created_at: chrono::Utc::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use threesixty_core::categories::NotificationCategory;
    use threesixty_core::channels::Channel;

    use super::*;

    fn change(enabled: bool) -> PreferenceChange {
        PreferenceChange {
            category: NotificationCategory::Tasks,
            channel: Channel::Email,
            enabled,
        }
    }

    #[tokio::test]
    async fn insert_missing_does_not_overwrite() {
        let store = InMemoryStore::new();
        store.upsert_preferences("u1", &[change(false)]).await.unwrap();

        let inserted = store.insert_missing_preferences("u1", &[change(true)]).await.unwrap();
        assert_eq!(inserted, 0);

        let rows = store.list_preferences("u1").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].enabled);
    }

    #[tokio::test]
    async fn upsert_overwrites_in_place() {
        let store = InMemoryStore::new();
        let first = store.upsert_preferences("u1", &[change(true)]).await.unwrap();
        let second = store.upsert_preferences("u1", &[change(false)]).await.unwrap();
        assert_eq!(first[0].id, second[0].id);
        assert!(!second[0].enabled);
        assert_eq!(store.preference_count().await, 1);
    }

    #[tokio::test]
    async fn rows_are_scoped_per_user() {
        let store = InMemoryStore::new();
        store.upsert_preferences("u1", &[change(false)]).await.unwrap();
        assert!(store.list_preferences("u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_settings_insert_is_duplicate() {
        let store = InMemoryStore::new();
        let defaults = NewNotificationSettings::default();
        store.insert_settings("u1", &defaults).await.unwrap();
        assert_matches!(
            store.insert_settings("u1", &defaults).await,
            Err(StoreError::Duplicate { .. })
        );
    }

    #[tokio::test]
    async fn update_without_row_returns_none() {
        let store = InMemoryStore::new();
        let update = SettingsUpdate {
            email_notifications_enabled: Some(false),
            ..Default::default()
        };
        assert!(store.update_settings("u1", &update).await.unwrap().is_none());
        assert_eq!(store.settings_count().await, 0);
    }
}
