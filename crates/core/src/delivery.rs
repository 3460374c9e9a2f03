//! Final "should this notification go out on channel C" decision.
//!
//! Resolution order is master toggle, then category preference, then quiet
//! hours. All three must pass.

use serde::Serialize;

use crate::channels::Channel;
use crate::quiet_hours::QuietHours;
use crate::types::Timestamp;

/// Outcome of a delivery check, with the layer that blocked it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryDecision {
    Deliver,
    MasterDisabled,
    CategoryDisabled,
    QuietHours,
}

impl DeliveryDecision {
    pub fn is_deliver(self) -> bool {
        self == DeliveryDecision::Deliver
    }
}

/// Combine the layers for one channel.
///
/// `quiet_hours` is `None` when the user's window could not be parsed; the
/// check is then skipped rather than blocking everything.
pub fn decide(
    channel: Channel,
    master_enabled: bool,
    category_enabled: bool,
    quiet_hours: Option<&QuietHours>,
    now: Timestamp,
) -> DeliveryDecision {
    if !master_enabled {
        return DeliveryDecision::MasterDisabled;
    }
    if !category_enabled {
        return DeliveryDecision::CategoryDisabled;
    }
    if channel.is_interruptive() && quiet_hours.is_some_and(|q| q.contains(now)) {
        return DeliveryDecision::QuietHours;
    }
    DeliveryDecision::Deliver
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn night() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 1, 15, 23, 0, 0).unwrap()
    }

    fn noon() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap()
    }

    fn window() -> QuietHours {
        QuietHours::parse("22:00", "08:00", "UTC").unwrap()
    }

    #[test]
    fn master_toggle_wins_over_category() {
        let d = decide(Channel::Email, false, true, None, noon());
        assert_eq!(d, DeliveryDecision::MasterDisabled);
    }

    #[test]
    fn category_toggle_blocks() {
        let d = decide(Channel::Push, true, false, Some(&window()), noon());
        assert_eq!(d, DeliveryDecision::CategoryDisabled);
    }

    #[test]
    fn quiet_hours_suppress_push_and_in_app() {
        assert_eq!(
            decide(Channel::Push, true, true, Some(&window()), night()),
            DeliveryDecision::QuietHours
        );
        assert_eq!(
            decide(Channel::InApp, true, true, Some(&window()), night()),
            DeliveryDecision::QuietHours
        );
    }

    #[test]
    fn quiet_hours_never_suppress_email() {
        assert!(decide(Channel::Email, true, true, Some(&window()), night()).is_deliver());
    }

    #[test]
    fn outside_quiet_hours_delivers() {
        assert!(decide(Channel::Push, true, true, Some(&window()), noon()).is_deliver());
    }

    #[test]
    fn unparsed_window_does_not_block() {
        assert!(decide(Channel::Push, true, true, None, night()).is_deliver());
    }
}
