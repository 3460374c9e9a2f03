//! Postgres store for the `notification_preferences` and
//! `user_notification_settings` tables.

use async_trait::async_trait;
use threesixty_core::notification_settings::SettingsUpdate;
use threesixty_core::preferences::PreferenceChange;

use crate::error::StoreError;
use crate::models::notification::{
    NewNotificationSettings, NotificationPreference, UserNotificationSettings,
};
use crate::store::NotificationStore;
use crate::DbPool;

/// Column list for `notification_preferences` queries.
const PREF_COLUMNS: &str = "id, user_id, category, channel, enabled, created_at, updated_at";

/// Column list for `user_notification_settings` queries.
const SETTINGS_COLUMNS: &str = "id, user_id, email_notifications_enabled, \
    push_notifications_enabled, in_app_notifications_enabled, quiet_hours_start, \
    quiet_hours_end, quiet_hours_timezone, created_at, updated_at";

/// [`NotificationStore`] backed by a Postgres pool.
#[derive(Clone)]
pub struct PgNotificationStore {
    pool: DbPool,
}

impl PgNotificationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Split changes into parallel arrays for `UNNEST`.
fn change_columns(rows: &[PreferenceChange]) -> (Vec<String>, Vec<String>, Vec<bool>) {
    let mut categories = Vec::with_capacity(rows.len());
    let mut channels = Vec::with_capacity(rows.len());
    let mut enabled = Vec::with_capacity(rows.len());
    for row in rows {
        categories.push(row.category.as_str().to_string());
        channels.push(row.channel.as_str().to_string());
        enabled.push(row.enabled);
    }
    (categories, channels, enabled)
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn list_preferences(
        &self,
        user_id: &str,
    ) -> Result<Vec<NotificationPreference>, StoreError> {
        let query = format!(
            "SELECT {PREF_COLUMNS} FROM notification_preferences \
             WHERE user_id = $1 \
             ORDER BY category, channel"
        );
        let rows = sqlx::query_as::<_, NotificationPreference>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Uses `ON CONFLICT DO NOTHING` so a concurrent explicit update is never
    /// overwritten by a default.
    async fn insert_missing_preferences(
        &self,
        user_id: &str,
        rows: &[PreferenceChange],
    ) -> Result<u64, StoreError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let (categories, channels, enabled) = change_columns(rows);
        let result = sqlx::query(
            "INSERT INTO notification_preferences (user_id, category, channel, enabled) \
             SELECT $1, t.category, t.channel, t.enabled \
             FROM UNNEST($2::text[], $3::text[], $4::bool[]) AS t(category, channel, enabled) \
             ON CONFLICT (user_id, category, channel) DO NOTHING",
        )
        .bind(user_id)
        .bind(&categories)
        .bind(&channels)
        .bind(&enabled)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn upsert_preferences(
        &self,
        user_id: &str,
        rows: &[PreferenceChange],
    ) -> Result<Vec<NotificationPreference>, StoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let (categories, channels, enabled) = change_columns(rows);
        let query = format!(
            "INSERT INTO notification_preferences (user_id, category, channel, enabled) \
             SELECT $1, t.category, t.channel, t.enabled \
             FROM UNNEST($2::text[], $3::text[], $4::bool[]) AS t(category, channel, enabled) \
             ON CONFLICT (user_id, category, channel) DO UPDATE SET \
                enabled = EXCLUDED.enabled, \
                updated_at = NOW() \
             RETURNING {PREF_COLUMNS}"
        );
        let rows = sqlx::query_as::<_, NotificationPreference>(&query)
            .bind(user_id)
            .bind(&categories)
            .bind(&channels)
            .bind(&enabled)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_settings(
        &self,
        user_id: &str,
    ) -> Result<Option<UserNotificationSettings>, StoreError> {
        let query =
            format!("SELECT {SETTINGS_COLUMNS} FROM user_notification_settings WHERE user_id = $1");
        let row = sqlx::query_as::<_, UserNotificationSettings>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_settings(
        &self,
        user_id: &str,
        values: &NewNotificationSettings,
    ) -> Result<UserNotificationSettings, StoreError> {
        let query = format!(
            "INSERT INTO user_notification_settings \
                (user_id, email_notifications_enabled, push_notifications_enabled, \
                 in_app_notifications_enabled, quiet_hours_start, quiet_hours_end, \
                 quiet_hours_timezone) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {SETTINGS_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserNotificationSettings>(&query)
            .bind(user_id)
            .bind(values.email_notifications_enabled)
            .bind(values.push_notifications_enabled)
            .bind(values.in_app_notifications_enabled)
            .bind(&values.quiet_hours_start)
            .bind(&values.quiet_hours_end)
            .bind(&values.quiet_hours_timezone)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Uses `COALESCE` to only overwrite fields that are `Some` in the input.
    async fn update_settings(
        &self,
        user_id: &str,
        update: &SettingsUpdate,
    ) -> Result<Option<UserNotificationSettings>, StoreError> {
        let query = format!(
            "UPDATE user_notification_settings SET \
                email_notifications_enabled = COALESCE($2, email_notifications_enabled), \
                push_notifications_enabled = COALESCE($3, push_notifications_enabled), \
                in_app_notifications_enabled = COALESCE($4, in_app_notifications_enabled), \
                quiet_hours_start = COALESCE($5, quiet_hours_start), \
                quiet_hours_end = COALESCE($6, quiet_hours_end), \
                quiet_hours_timezone = COALESCE($7, quiet_hours_timezone), \
                updated_at = NOW() \
             WHERE user_id = $1 \
             RETURNING {SETTINGS_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserNotificationSettings>(&query)
            .bind(user_id)
            .bind(update.email_notifications_enabled)
            .bind(update.push_notifications_enabled)
            .bind(update.in_app_notifications_enabled)
            .bind(&update.quiet_hours_start)
            .bind(&update.quiet_hours_end)
            .bind(&update.quiet_hours_timezone)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
