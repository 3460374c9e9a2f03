//! Per-category preference resolution.
//!
//! Stored rows are sparse: a (category, channel) pair without a row falls
//! back to [`NotificationCategory::default_enabled`]. The resolver in the API
//! crate uses [`missing_defaults`] to materialize those rows on first read.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::categories::NotificationCategory;
use crate::channels::Channel;
use crate::error::CoreError;

/// Stored enabled flags keyed by (category, channel).
#[derive(Debug, Clone, Default)]
pub struct PreferenceMatrix {
    values: HashMap<(NotificationCategory, Channel), bool>,
}

impl PreferenceMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: NotificationCategory, channel: Channel, enabled: bool) {
        self.values.insert((category, channel), enabled);
    }

    pub fn get(&self, category: NotificationCategory, channel: Channel) -> Option<bool> {
        self.values.get(&(category, channel)).copied()
    }

    /// Stored value, or the category default when no row exists.
    pub fn effective(&self, category: NotificationCategory, channel: Channel) -> bool {
        self.get(category, channel)
            .unwrap_or_else(|| category.default_enabled(channel))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(NotificationCategory, Channel, bool)> for PreferenceMatrix {
    fn from_iter<I: IntoIterator<Item = (NotificationCategory, Channel, bool)>>(iter: I) -> Self {
        let mut matrix = PreferenceMatrix::new();
        for (category, channel, enabled) in iter {
            matrix.insert(category, channel, enabled);
        }
        matrix
    }
}

/// Resolved state of one category across every channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPreference {
    pub notification_category: NotificationCategory,
    pub in_app_enabled: bool,
    pub email_enabled: bool,
    pub push_enabled: bool,
}

impl CategoryPreference {
    pub fn enabled(&self, channel: Channel) -> bool {
        match channel {
            Channel::InApp => self.in_app_enabled,
            Channel::Email => self.email_enabled,
            Channel::Push => self.push_enabled,
        }
    }
}

/// A (category, channel, enabled) triple to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceChange {
    pub category: NotificationCategory,
    pub channel: Channel,
    pub enabled: bool,
}

/// Resolve a single category against the stored matrix.
pub fn resolve_category(
    matrix: &PreferenceMatrix,
    category: NotificationCategory,
) -> CategoryPreference {
    CategoryPreference {
        notification_category: category,
        in_app_enabled: matrix.effective(category, Channel::InApp),
        email_enabled: matrix.effective(category, Channel::Email),
        push_enabled: matrix.effective(category, Channel::Push),
    }
}

/// Resolve every category, in [`NotificationCategory::ALL`] order.
pub fn resolve_all(matrix: &PreferenceMatrix) -> Vec<CategoryPreference> {
    NotificationCategory::ALL
        .into_iter()
        .map(|category| resolve_category(matrix, category))
        .collect()
}

/// Default rows for every (category, channel) pair absent from `matrix`.
pub fn missing_defaults(matrix: &PreferenceMatrix) -> Vec<PreferenceChange> {
    NotificationCategory::ALL
        .into_iter()
        .flat_map(|category| Channel::ALL.into_iter().map(move |channel| (category, channel)))
        .filter(|(category, channel)| matrix.get(*category, *channel).is_none())
        .map(|(category, channel)| PreferenceChange {
            category,
            channel,
            enabled: category.default_enabled(channel),
        })
        .collect()
}

/// Partial update of one category's channels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PreferenceUpdate {
    pub in_app_enabled: Option<bool>,
    pub email_enabled: Option<bool>,
    pub push_enabled: Option<bool>,
}

impl PreferenceUpdate {
    /// Rows to upsert for `category`, one per provided field.
    ///
    /// Fails when no channel field is present.
    pub fn changes(
        &self,
        category: NotificationCategory,
    ) -> Result<Vec<PreferenceChange>, CoreError> {
        let changes: Vec<PreferenceChange> = [
            (Channel::InApp, self.in_app_enabled),
            (Channel::Email, self.email_enabled),
            (Channel::Push, self.push_enabled),
        ]
        .into_iter()
        .filter_map(|(channel, value)| {
            value.map(|enabled| PreferenceChange {
                category,
                channel,
                enabled,
            })
        })
        .collect();

        if changes.is_empty() {
            return Err(CoreError::Validation(
                "At least one of in_app_enabled, email_enabled or push_enabled is required"
                    .to_string(),
            ));
        }
        Ok(changes)
    }
}
