//! User-wide notification settings: defaults and the update allow-list.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::quiet_hours::{parse_clock_time, parse_timezone};

pub const DEFAULT_QUIET_HOURS_START: &str = "22:00";
pub const DEFAULT_QUIET_HOURS_END: &str = "08:00";
pub const DEFAULT_QUIET_HOURS_TIMEZONE: &str = "America/New_York";

pub const FIELD_EMAIL_ENABLED: &str = "email_notifications_enabled";
pub const FIELD_PUSH_ENABLED: &str = "push_notifications_enabled";
pub const FIELD_IN_APP_ENABLED: &str = "in_app_notifications_enabled";
pub const FIELD_QUIET_HOURS_START: &str = "quiet_hours_start";
pub const FIELD_QUIET_HOURS_END: &str = "quiet_hours_end";
pub const FIELD_QUIET_HOURS_TIMEZONE: &str = "quiet_hours_timezone";

/// Fields a client may change. Anything else in an update body is dropped.
pub const UPDATABLE_FIELDS: &[&str] = &[
    FIELD_EMAIL_ENABLED,
    FIELD_PUSH_ENABLED,
    FIELD_IN_APP_ENABLED,
    FIELD_QUIET_HOURS_START,
    FIELD_QUIET_HOURS_END,
    FIELD_QUIET_HOURS_TIMEZONE,
];

/// A validated partial update of a user's settings row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SettingsUpdate {
    pub email_notifications_enabled: Option<bool>,
    pub push_notifications_enabled: Option<bool>,
    pub in_app_notifications_enabled: Option<bool>,
    pub quiet_hours_start: Option<String>,
    pub quiet_hours_end: Option<String>,
    pub quiet_hours_timezone: Option<String>,
}

impl SettingsUpdate {
    /// Build an update from an arbitrary JSON object.
    ///
    /// Keys outside [`UPDATABLE_FIELDS`] are ignored. Fails when nothing
    /// updatable remains or when a value has the wrong shape.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, CoreError> {
        let mut update = SettingsUpdate::default();

        for (key, value) in fields {
            match key.as_str() {
                FIELD_EMAIL_ENABLED => update.email_notifications_enabled = Some(bool_field(key, value)?),
                FIELD_PUSH_ENABLED => update.push_notifications_enabled = Some(bool_field(key, value)?),
                FIELD_IN_APP_ENABLED => update.in_app_notifications_enabled = Some(bool_field(key, value)?),
                FIELD_QUIET_HOURS_START => {
                    let raw = string_field(key, value)?;
                    update.quiet_hours_start = Some(normalize_clock_time(&raw)?);
                }
                FIELD_QUIET_HOURS_END => {
                    let raw = string_field(key, value)?;
                    update.quiet_hours_end = Some(normalize_clock_time(&raw)?);
                }
                FIELD_QUIET_HOURS_TIMEZONE => {
                    let raw = string_field(key, value)?;
                    parse_timezone(&raw)?;
                    update.quiet_hours_timezone = Some(raw.trim().to_string());
                }
                _ => {}
            }
        }

        if update.is_empty() {
            return Err(CoreError::Validation(format!(
                "No valid fields to update. Allowed fields: {UPDATABLE_FIELDS:?}"
            )));
        }
        Ok(update)
    }

    pub fn is_empty(&self) -> bool {
        self == &SettingsUpdate::default()
    }
}

fn bool_field(key: &str, value: &Value) -> Result<bool, CoreError> {
    value
        .as_bool()
        .ok_or_else(|| CoreError::Validation(format!("'{key}' must be a boolean")))
}

fn string_field(key: &str, value: &Value) -> Result<String, CoreError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CoreError::Validation(format!("'{key}' must be a string")))
}

/// Store quiet-hour bounds uniformly as `HH:MM`.
fn normalize_clock_time(raw: &str) -> Result<String, CoreError> {
    Ok(parse_clock_time(raw)?.format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_object_is_rejected() {
        assert_matches!(
            SettingsUpdate::from_fields(&Map::new()),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn unknown_keys_alone_are_rejected() {
        let fields = object(json!({ "user_id": "someone_else", "id": 4 }));
        assert_matches!(SettingsUpdate::from_fields(&fields), Err(CoreError::Validation(_)));
    }

    #[test]
    fn unknown_keys_are_dropped() {
        let fields = object(json!({ "push_notifications_enabled": false, "user_id": "x" }));
        let update = SettingsUpdate::from_fields(&fields).unwrap();
        assert_eq!(
            update,
            SettingsUpdate {
                push_notifications_enabled: Some(false),
                ..Default::default()
            }
        );
    }

    #[test]
    fn quiet_hours_are_normalized() {
        let fields = object(json!({
            "quiet_hours_start": "21:30:00",
            "quiet_hours_timezone": "Europe/Berlin",
        }));
        let update = SettingsUpdate::from_fields(&fields).unwrap();
        assert_eq!(update.quiet_hours_start.as_deref(), Some("21:30"));
        assert_eq!(update.quiet_hours_timezone.as_deref(), Some("Europe/Berlin"));
    }

    #[test]
    fn wrong_types_are_rejected() {
        let fields = object(json!({ "email_notifications_enabled": "yes" }));
        assert_matches!(SettingsUpdate::from_fields(&fields), Err(CoreError::Validation(_)));

        let fields = object(json!({ "quiet_hours_timezone": "Nowhere/Special" }));
        assert_matches!(SettingsUpdate::from_fields(&fields), Err(CoreError::Validation(_)));
    }
}
