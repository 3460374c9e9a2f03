//! Route definitions for the `/notifications` resource.
//!
//! All endpoints require authentication.

use axum::routing::get;
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /preferences               -> get_preferences
/// PUT    /preferences               -> update_preference
///
/// GET    /settings                  -> get_settings
/// PUT    /settings                  -> update_settings
///
/// GET    /delivery                  -> delivery
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/preferences",
            get(notification::get_preferences).put(notification::update_preference),
        )
        .route(
            "/settings",
            get(notification::get_settings).put(notification::update_settings),
        )
        .route("/delivery", get(notification::delivery))
}
