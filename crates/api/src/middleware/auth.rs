//! Bearer-token extractors for Axum handlers.
//!
//! Token verification is delegated to the [`IdentityProvider`] held in
//! [`AppState`], so handlers never see raw tokens.
//!
//! [`IdentityProvider`]: crate::auth::IdentityProvider

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use threesixty_core::error::CoreError;
use threesixty_core::principal::Principal;

use crate::error::AppError;
use crate::state::AppState;

/// Authenticated principal extracted from the `Authorization: Bearer` header.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %auth.0.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let principal = state.identity.me(token).await?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser(principal))
    }
}

/// Principal if the request carries a valid token, `None` otherwise.
///
/// For endpoints that answer anonymous callers differently rather than
/// rejecting them.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<Principal>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let principal = match token {
            Some(token) => state.identity.me(token).await?,
            None => None,
        };

        Ok(MaybeAuthUser(principal))
    }
}
