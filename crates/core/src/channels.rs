//! Notification delivery channels.
//!
//! The string values must match the `channel` column of
//! `notification_preferences`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// In-app notification shown in the notification bell.
pub const CHANNEL_IN_APP: &str = "in_app";

/// Email notification.
pub const CHANNEL_EMAIL: &str = "email";

/// Browser / device push notification.
pub const CHANNEL_PUSH: &str = "push";

/// A delivery mechanism for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    InApp,
    Email,
    Push,
}

impl Channel {
    /// Every channel, in column order of the preference response.
    pub const ALL: [Channel; 3] = [Channel::InApp, Channel::Email, Channel::Push];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::InApp => CHANNEL_IN_APP,
            Channel::Email => CHANNEL_EMAIL,
            Channel::Push => CHANNEL_PUSH,
        }
    }

    /// Whether quiet hours suppress this channel.
    ///
    /// Email is read when the recipient chooses to, so it is never held back.
    pub fn is_interruptive(self) -> bool {
        matches!(self, Channel::InApp | Channel::Push)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid channel '{s}'. Must be one of: in_app, email, push"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_known_channels() {
        assert_eq!("in_app".parse::<Channel>().unwrap(), Channel::InApp);
        assert_eq!("email".parse::<Channel>().unwrap(), Channel::Email);
        assert_eq!("push".parse::<Channel>().unwrap(), Channel::Push);
    }

    #[test]
    fn rejects_unknown_channel() {
        assert_matches!("sms".parse::<Channel>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn email_is_not_interruptive() {
        assert!(!Channel::Email.is_interruptive());
        assert!(Channel::Push.is_interruptive());
        assert!(Channel::InApp.is_interruptive());
    }
}
