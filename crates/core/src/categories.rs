//! Notification categories and their per-channel defaults.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::channels::Channel;
use crate::error::CoreError;

/// A logical grouping of notification-triggering events.
///
/// The set is closed; the string values are stored in the `category`
/// column of `notification_preferences`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    Payments,
    Inspections,
    WorkOrders,
    Tasks,
    Properties,
    Connections,
    Reminders,
    Messages,
    Marketing,
}

impl NotificationCategory {
    /// Every category. Preference listings are returned in this order.
    pub const ALL: [NotificationCategory; 9] = [
        NotificationCategory::Payments,
        NotificationCategory::Inspections,
        NotificationCategory::WorkOrders,
        NotificationCategory::Tasks,
        NotificationCategory::Properties,
        NotificationCategory::Connections,
        NotificationCategory::Reminders,
        NotificationCategory::Messages,
        NotificationCategory::Marketing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NotificationCategory::Payments => "payments",
            NotificationCategory::Inspections => "inspections",
            NotificationCategory::WorkOrders => "work_orders",
            NotificationCategory::Tasks => "tasks",
            NotificationCategory::Properties => "properties",
            NotificationCategory::Connections => "connections",
            NotificationCategory::Reminders => "reminders",
            NotificationCategory::Messages => "messages",
            NotificationCategory::Marketing => "marketing",
        }
    }

    /// Value used for a (category, channel) pair that has no stored row.
    ///
    /// In-app is always on. Marketing is opt-in for email and push.
    pub fn default_enabled(self, channel: Channel) -> bool {
        match channel {
            Channel::InApp => true,
            Channel::Email | Channel::Push => self != NotificationCategory::Marketing,
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = NotificationCategory::ALL.iter().map(|c| c.as_str()).collect();
                CoreError::Validation(format!(
                    "Invalid notification category '{s}'. Must be one of: {valid:?}"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn every_category_round_trips_through_its_string() {
        for category in NotificationCategory::ALL {
            assert_eq!(category.as_str().parse::<NotificationCategory>().unwrap(), category);
        }
    }

    #[test]
    fn unknown_category_is_a_validation_error() {
        assert_matches!(
            "newsletters".parse::<NotificationCategory>(),
            Err(CoreError::Validation(msg)) if msg.contains("newsletters")
        );
    }

    #[test]
    fn marketing_defaults_to_in_app_only() {
        let m = NotificationCategory::Marketing;
        assert!(m.default_enabled(Channel::InApp));
        assert!(!m.default_enabled(Channel::Email));
        assert!(!m.default_enabled(Channel::Push));
    }

    #[test]
    fn other_categories_default_to_all_channels() {
        for category in NotificationCategory::ALL {
            if category == NotificationCategory::Marketing {
                continue;
            }
            for channel in Channel::ALL {
                assert!(category.default_enabled(channel), "{category}/{channel}");
            }
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&NotificationCategory::WorkOrders).unwrap();
        assert_eq!(json, "\"work_orders\"");
    }
}
