pub mod access;
pub mod health;
pub mod notification;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /notifications/preferences                       get, update (auth required)
/// /notifications/settings                          get, update (auth required)
/// /notifications/delivery                          delivery check (auth required)
///
/// /access/authorize                                access decision (POST, public)
/// /access/me                                       user type + default route
/// /access/post-login-redirect                      safe post-login target
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/notifications", notification::router())
        .nest("/access", access::router())
}
