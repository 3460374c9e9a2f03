//! Handlers for the `/access` resource.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use threesixty_core::access::AccessRequirement;
use threesixty_core::error::CoreError;

use crate::error::AppResult;
use crate::extract::{ValidJson, ValidQuery};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::state::AppState;

/// Body for `POST /access/authorize`.
#[derive(Debug, Deserialize)]
pub struct AuthorizeRequest {
    pub path: String,
    #[serde(flatten)]
    pub requirement: AccessRequirement,
    /// Client metadata recorded with any audit entry.
    #[serde(default)]
    pub context: Value,
}

#[derive(Debug, Deserialize)]
pub struct PostLoginRedirectQuery {
    pub redirect_url: Option<String>,
}

/// POST /api/v1/access/authorize
///
/// Anonymous callers are not rejected; they get a redirect-to-login decision.
pub async fn authorize(
    MaybeAuthUser(principal): MaybeAuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<AuthorizeRequest>,
) -> AppResult<Json<Value>> {
    if input.path.trim().is_empty() {
        return Err(CoreError::Validation("path is required".into()).into());
    }

    let decision = state
        .access
        .authorize(principal.as_ref(), &input.path, &input.requirement, input.context)
        .await;

    Ok(Json(json!({
        "success": true,
        "decision": decision,
    })))
}

/// GET /api/v1/access/me
pub async fn me(AuthUser(principal): AuthUser, State(state): State<AppState>) -> Json<Value> {
    let user_type = state.access.classify(&principal);

    Json(json!({
        "success": true,
        "user_type": user_type,
        "default_route": user_type.default_route(),
    }))
}

/// GET /api/v1/access/post-login-redirect?redirect_url=
pub async fn post_login_redirect(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<PostLoginRedirectQuery>,
) -> Json<Value> {
    let redirect_to = state
        .access
        .post_login_redirect(params.redirect_url.as_deref(), &principal);

    Json(json!({
        "success": true,
        "redirect_to": redirect_to,
    }))
}
