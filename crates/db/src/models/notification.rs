//! Notification preference and settings models and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use threesixty_core::categories::NotificationCategory;
use threesixty_core::channels::Channel;
use threesixty_core::error::CoreError;
use threesixty_core::notification_settings::{
    SettingsUpdate, DEFAULT_QUIET_HOURS_END, DEFAULT_QUIET_HOURS_START,
    DEFAULT_QUIET_HOURS_TIMEZONE,
};
use threesixty_core::preferences::PreferenceMatrix;
use threesixty_core::quiet_hours::QuietHours;
use threesixty_core::types::{DbId, Timestamp};

/// A row from the `notification_preferences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationPreference {
    pub id: DbId,
    pub user_id: String,
    pub category: String,
    pub channel: String,
    pub enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NotificationPreference {
    /// The typed (category, channel) key of this row.
    pub fn key(&self) -> Result<(NotificationCategory, Channel), CoreError> {
        Ok((self.category.parse()?, self.channel.parse()?))
    }
}

/// Build the lookup matrix for a user's rows.
///
/// Rows with an unrecognized category or channel are skipped; the check
/// constraints make them unreachable in Postgres.
pub fn preference_matrix(rows: &[NotificationPreference]) -> PreferenceMatrix {
    rows.iter()
        .filter_map(|row| match row.key() {
            Ok((category, channel)) => Some((category, channel, row.enabled)),
            Err(e) => {
                tracing::warn!(
                    id = row.id,
                    category = %row.category,
                    channel = %row.channel,
                    error = %e,
                    "Skipping unrecognized notification preference row"
                );
                None
            }
        })
        .collect()
}

/// A row from the `user_notification_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserNotificationSettings {
    pub id: DbId,
    pub user_id: String,
    pub email_notifications_enabled: bool,
    pub push_notifications_enabled: bool,
    pub in_app_notifications_enabled: bool,
    pub quiet_hours_start: String,
    pub quiet_hours_end: String,
    pub quiet_hours_timezone: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserNotificationSettings {
    /// Master toggle for `channel`.
    pub fn channel_enabled(&self, channel: Channel) -> bool {
        match channel {
            Channel::InApp => self.in_app_notifications_enabled,
            Channel::Email => self.email_notifications_enabled,
            Channel::Push => self.push_notifications_enabled,
        }
    }

    pub fn quiet_hours(&self) -> Result<QuietHours, CoreError> {
        QuietHours::parse(
            &self.quiet_hours_start,
            &self.quiet_hours_end,
            &self.quiet_hours_timezone,
        )
    }
}

/// Complete values for inserting a settings row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotificationSettings {
    pub email_notifications_enabled: bool,
    pub push_notifications_enabled: bool,
    pub in_app_notifications_enabled: bool,
    pub quiet_hours_start: String,
    pub quiet_hours_end: String,
    pub quiet_hours_timezone: String,
}

impl Default for NewNotificationSettings {
    fn default() -> Self {
        Self {
            email_notifications_enabled: true,
            push_notifications_enabled: true,
            in_app_notifications_enabled: true,
            quiet_hours_start: DEFAULT_QUIET_HOURS_START.to_string(),
            quiet_hours_end: DEFAULT_QUIET_HOURS_END.to_string(),
            quiet_hours_timezone: DEFAULT_QUIET_HOURS_TIMEZONE.to_string(),
        }
    }
}

impl NewNotificationSettings {
    /// Defaults with every `Some` field of `update` applied.
    pub fn with_overrides(update: &SettingsUpdate) -> Self {
        let mut values = Self::default();
        values.apply(update);
        values
    }

    /// Overwrite the fields `update` provides.
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(v) = update.email_notifications_enabled {
            self.email_notifications_enabled = v;
        }
        if let Some(v) = update.push_notifications_enabled {
            self.push_notifications_enabled = v;
        }
        if let Some(v) = update.in_app_notifications_enabled {
            self.in_app_notifications_enabled = v;
        }
        if let Some(v) = &update.quiet_hours_start {
            self.quiet_hours_start = v.clone();
        }
        if let Some(v) = &update.quiet_hours_end {
            self.quiet_hours_end = v.clone();
        }
        if let Some(v) = &update.quiet_hours_timezone {
            self.quiet_hours_timezone = v.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_keep_unspecified_defaults() {
        let update = SettingsUpdate {
            push_notifications_enabled: Some(false),
            quiet_hours_end: Some("07:30".into()),
            ..Default::default()
        };
        let values = NewNotificationSettings::with_overrides(&update);
        assert!(!values.push_notifications_enabled);
        assert!(values.email_notifications_enabled);
        assert_eq!(values.quiet_hours_start, "22:00");
        assert_eq!(values.quiet_hours_end, "07:30");
        assert_eq!(values.quiet_hours_timezone, "America/New_York");
    }
}
