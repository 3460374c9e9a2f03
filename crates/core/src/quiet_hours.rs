//! Quiet-hours window evaluation.
//!
//! Bounds are local wall-clock times (`HH:MM`) in an IANA timezone. A window
//! whose start is later than its end wraps past midnight; equal bounds mean
//! an empty window.

use chrono::{NaiveTime, Timelike};
use chrono_tz::Tz;

use crate::error::CoreError;
use crate::types::Timestamp;

/// A parsed quiet-hours window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub timezone: Tz,
}

impl QuietHours {
    /// Parse the stored representation.
    pub fn parse(start: &str, end: &str, timezone: &str) -> Result<Self, CoreError> {
        Ok(Self {
            start: parse_clock_time(start)?,
            end: parse_clock_time(end)?,
            timezone: parse_timezone(timezone)?,
        })
    }

    /// Whether `now` falls inside the window.
    pub fn contains(&self, now: Timestamp) -> bool {
        let local = now.with_timezone(&self.timezone).time();
        // Compare at minute precision so `08:00` ends the window at 08:00:00.
        let local = NaiveTime::from_hms_opt(local.hour(), local.minute(), 0).unwrap_or(local);

        if self.start < self.end {
            self.start <= local && local < self.end
        } else if self.start > self.end {
            local >= self.start || local < self.end
        } else {
            false
        }
    }
}

/// Parse `HH:MM` (24h). `HH:MM:SS` is accepted for values read back from
/// Postgres `TIME` columns.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime, CoreError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| {
            CoreError::Validation(format!("Invalid time '{value}'. Expected HH:MM (24h)"))
        })
}

/// Parse an IANA timezone name such as `America/New_York`.
pub fn parse_timezone(value: &str) -> Result<Tz, CoreError> {
    value
        .trim()
        .parse::<Tz>()
        .map_err(|_| CoreError::Validation(format!("Unknown timezone '{value}'")))
}
