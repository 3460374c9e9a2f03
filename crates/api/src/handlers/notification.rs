//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`]; the user id is
//! always taken from the principal, never from the request body.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use threesixty_core::categories::NotificationCategory;
use threesixty_core::channels::Channel;
use threesixty_core::error::CoreError;
use threesixty_core::preferences::PreferenceUpdate;

use crate::error::AppResult;
use crate::extract::{ValidJson, ValidQuery};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for `PUT /notifications/preferences`.
#[derive(Debug, Deserialize)]
pub struct UpdatePreferenceRequest {
    pub notification_category: Option<String>,
    #[serde(flatten)]
    pub update: PreferenceUpdate,
}

/// Query parameters for `GET /notifications/delivery`.
#[derive(Debug, Deserialize)]
pub struct DeliveryQuery {
    pub category: String,
    pub channel: String,
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications/preferences
///
/// Resolved preferences for every category, creating default rows on first
/// access.
pub async fn get_preferences(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Value>> {
    let preferences = state.preferences.get_preferences(&principal.id).await?;

    Ok(Json(json!({
        "success": true,
        "preferences": preferences,
    })))
}

/// PUT /api/v1/notifications/preferences
///
/// Set one or more channel flags for a single category.
pub async fn update_preference(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<UpdatePreferenceRequest>,
) -> AppResult<Json<Value>> {
    let category: NotificationCategory = input
        .notification_category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| CoreError::Validation("notification_category is required".into()))?
        .parse()?;

    let preference = state
        .preferences
        .set_preference(&principal.id, category, &input.update)
        .await?;

    Ok(Json(json!({
        "success": true,
        "preference": preference,
    })))
}

// ---------------------------------------------------------------------------
// Master settings
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications/settings
pub async fn get_settings(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Value>> {
    let settings = state.preferences.get_master_settings(&principal.id).await?;

    Ok(Json(json!({
        "success": true,
        "settings": settings,
    })))
}

/// PUT /api/v1/notifications/settings
///
/// Accepts an arbitrary object; only the updatable fields are applied and
/// a body with none of them is rejected.
pub async fn update_settings(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    ValidJson(fields): ValidJson<Map<String, Value>>,
) -> AppResult<Json<Value>> {
    let settings = state
        .preferences
        .update_master_settings(&principal.id, &fields)
        .await?;

    Ok(Json(json!({
        "success": true,
        "settings": settings,
    })))
}

// ---------------------------------------------------------------------------
// Delivery
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications/delivery?category=&channel=
///
/// Whether a notification of `category` would be delivered to the caller on
/// `channel` right now.
pub async fn delivery(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<DeliveryQuery>,
) -> AppResult<Json<Value>> {
    let category: NotificationCategory = params.category.parse()?;
    let channel: Channel = params.channel.parse()?;

    let decision = state
        .preferences
        .should_deliver(&principal.id, category, channel, chrono::Utc::now())
        .await?;

    Ok(Json(json!({
        "success": true,
        "deliver": decision.is_deliver(),
        "decision": decision,
    })))
}
