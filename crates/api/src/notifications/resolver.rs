use std::sync::Arc;

use serde_json::{Map, Value};
use threesixty_core::categories::NotificationCategory;
use threesixty_core::channels::Channel;
use threesixty_core::delivery::{self, DeliveryDecision};
use threesixty_core::error::CoreError;
use threesixty_core::notification_settings::SettingsUpdate;
use threesixty_core::preferences::{
    missing_defaults, resolve_all, resolve_category, CategoryPreference, PreferenceUpdate,
};
use threesixty_core::types::Timestamp;
use threesixty_db::models::notification::{
    preference_matrix, NewNotificationSettings, UserNotificationSettings,
};
use threesixty_db::NotificationStore;

use crate::error::AppResult;

/// Resolves effective notification preferences for a user.
///
/// Stateless apart from the store handle; safe to share across requests.
pub struct PreferenceResolver {
    store: Arc<dyn NotificationStore>,
}

impl PreferenceResolver {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Every category's resolved state, materializing missing defaults.
    ///
    /// Missing rows are written insert-if-absent, so concurrent first reads
    /// for the same user are harmless and a second call writes nothing.
    pub async fn get_preferences(&self, user_id: &str) -> AppResult<Vec<CategoryPreference>> {
        require_user(user_id)?;

        let rows = self.store.list_preferences(user_id).await?;
        let matrix = preference_matrix(&rows);

        let missing = missing_defaults(&matrix);
        if !missing.is_empty() {
            let inserted = self.store.insert_missing_preferences(user_id, &missing).await?;
            tracing::info!(
                user_id = %user_id,
                missing = missing.len(),
                inserted,
                "Materialized default notification preferences"
            );
        }

        Ok(resolve_all(&matrix))
    }

    /// Overwrite the provided channels of one category.
    ///
    /// Returns the category's state after the write; channels left out of
    /// `update` keep their stored value (or default).
    pub async fn set_preference(
        &self,
        user_id: &str,
        category: NotificationCategory,
        update: &PreferenceUpdate,
    ) -> AppResult<CategoryPreference> {
        require_user(user_id)?;
        let changes = update.changes(category)?;

        self.store.upsert_preferences(user_id, &changes).await?;
        tracing::info!(
            user_id = %user_id,
            category = %category,
            channels = changes.len(),
            "Updated notification preference"
        );

        let rows = self.store.list_preferences(user_id).await?;
        Ok(resolve_category(&preference_matrix(&rows), category))
    }

    /// The user's settings row, created with defaults on first access.
    pub async fn get_master_settings(&self, user_id: &str) -> AppResult<UserNotificationSettings> {
        require_user(user_id)?;

        if let Some(settings) = self.store.find_settings(user_id).await? {
            return Ok(settings);
        }

        match self
            .store
            .insert_settings(user_id, &NewNotificationSettings::default())
            .await
        {
            Ok(settings) => {
                tracing::info!(user_id = %user_id, "Created default notification settings");
                Ok(settings)
            }
            // Another request created the row between our read and insert.
            Err(e) if e.is_duplicate() => self
                .store
                .find_settings(user_id)
                .await?
                .ok_or_else(|| vanished(user_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply the allow-listed fields of `fields` to the user's settings.
    ///
    /// Creates the row (defaults plus these fields) when it does not exist.
    /// Nothing is written when no allow-listed field is present.
    pub async fn update_master_settings(
        &self,
        user_id: &str,
        fields: &Map<String, Value>,
    ) -> AppResult<UserNotificationSettings> {
        require_user(user_id)?;
        let update = SettingsUpdate::from_fields(fields)?;

        if let Some(settings) = self.store.update_settings(user_id, &update).await? {
            tracing::info!(user_id = %user_id, "Updated notification settings");
            return Ok(settings);
        }

        let values = NewNotificationSettings::with_overrides(&update);
        match self.store.insert_settings(user_id, &values).await {
            Ok(settings) => {
                tracing::info!(user_id = %user_id, "Created notification settings with overrides");
                Ok(settings)
            }
            Err(e) if e.is_duplicate() => self
                .store
                .update_settings(user_id, &update)
                .await?
                .ok_or_else(|| vanished(user_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a `category` notification should go out on `channel` at `now`.
    pub async fn should_deliver(
        &self,
        user_id: &str,
        category: NotificationCategory,
        channel: Channel,
        now: Timestamp,
    ) -> AppResult<DeliveryDecision> {
        let settings = self.get_master_settings(user_id).await?;
        let rows = self.store.list_preferences(user_id).await?;
        let category_enabled = preference_matrix(&rows).effective(category, channel);

        let quiet_hours = match settings.quiet_hours() {
            Ok(q) => Some(q),
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "Ignoring unparseable quiet hours"
                );
                None
            }
        };

        let decision = delivery::decide(
            channel,
            settings.channel_enabled(channel),
            category_enabled,
            quiet_hours.as_ref(),
            now,
        );
        tracing::debug!(
            user_id = %user_id,
            category = %category,
            channel = %channel,
            decision = ?decision,
            "Resolved notification delivery"
        );
        Ok(decision)
    }
}

fn require_user(user_id: &str) -> Result<(), CoreError> {
    if user_id.trim().is_empty() {
        return Err(CoreError::Unauthorized("User id is required".into()));
    }
    Ok(())
}

fn vanished(user_id: &str) -> crate::error::AppError {
    CoreError::Internal(format!(
        "Notification settings for {user_id} conflicted on insert but could not be read back"
    ))
    .into()
}
