//! The `auth.me()` capability: bearer token in, principal (or nothing) out.

use async_trait::async_trait;
use threesixty_core::error::CoreError;
use threesixty_core::principal::Principal;

use super::jwt::{validate_token, JwtConfig};

/// Resolves the current principal from a bearer token.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` when the token does not identify anyone.
    async fn me(&self, token: &str) -> Result<Option<Principal>, CoreError>;
}

/// Identity from locally verified JWT session tokens.
pub struct JwtIdentityProvider {
    config: JwtConfig,
}

impl JwtIdentityProvider {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn me(&self, token: &str) -> Result<Option<Principal>, CoreError> {
        match validate_token(token, &self.config) {
            Ok(claims) => Ok(Some(claims.into_principal())),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected session token");
                Ok(None)
            }
        }
    }
}
