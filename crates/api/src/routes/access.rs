//! Route definitions for the `/access` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::access;
use crate::state::AppState;

/// Routes mounted at `/access`.
///
/// ```text
/// POST   /authorize                 -> authorize (token optional)
/// GET    /me                        -> me
/// GET    /post-login-redirect       -> post_login_redirect
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/authorize", post(access::authorize))
        .route("/me", get(access::me))
        .route("/post-login-redirect", get(access::post_login_redirect))
}
