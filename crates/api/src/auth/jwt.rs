//! JWT session-token validation.
//!
//! Session tokens are HS256-signed JWTs issued by the identity provider. The
//! principal attributes used for access decisions travel in the `metadata`
//! claim, alongside the standard `sub`/`exp`/`iat`.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use threesixty_core::principal::Principal;

/// Custom attributes carried in the `metadata` claim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_operator: bool,
    #[serde(default)]
    pub operator_id: Option<String>,
    #[serde(default)]
    pub is_contractor: bool,
    #[serde(default)]
    pub contractor_id: Option<String>,
    #[serde(default)]
    pub contractor_onboarding_completed: bool,
    #[serde(default)]
    pub user_profile_type: Option<String>,
    #[serde(default)]
    pub property_use_type: Option<String>,
    #[serde(default)]
    pub onboarding_completed: bool,
    /// Absent means active.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the identity provider's user id.
    pub sub: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub metadata: UserMetadata,
}

impl Claims {
    pub fn into_principal(self) -> Principal {
        let m = self.metadata;
        Principal {
            id: self.sub,
            email: self.email,
            role: m.role,
            is_operator: m.is_operator,
            operator_id: m.operator_id,
            is_contractor: m.is_contractor,
            contractor_id: m.contractor_id,
            contractor_onboarding_completed: m.contractor_onboarding_completed,
            user_profile_type: m.user_profile_type,
            property_use_type: m.property_use_type,
            onboarding_completed: m.onboarding_completed,
            is_active: m.is_active.unwrap_or(true),
        }
    }
}

/// Configuration for JWT validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
    /// Expected `iss` claim, if any.
    pub issuer: Option<String>,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var      | Required | Default |
    /// |--------------|----------|---------|
    /// | `JWT_SECRET` | **yes**  | --      |
    /// | `JWT_ISSUER` | no       | unset   |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let issuer = std::env::var("JWT_ISSUER")
            .ok()
            .filter(|s| !s.is_empty());

        Self { secret, issuer }
    }
}

/// Validate and decode a session token, returning the embedded [`Claims`].
///
/// Validates the signature, expiration, and (when configured) the issuer.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default(); // HS256, validates exp
    if let Some(issuer) = &config.issuer {
        validation.set_issuer(&[issuer]);
    }
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Sign `claims` with the configured secret.
///
/// Production tokens come from the identity provider; this exists for local
/// tooling and tests.
pub fn encode_token(
    claims: &Claims,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(), // HS256
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            issuer: None,
        }
    }

    fn claims(exp_offset: i64) -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            sub: "user_2abc".to_string(),
            exp: now + exp_offset,
            iat: now,
            iss: None,
            email: Some("pat@example.com".to_string()),
            metadata: UserMetadata {
                is_contractor: true,
                ..Default::default()
            },
        }
    }

    #[test]
    fn round_trip_maps_to_principal() {
        let token = encode_token(&claims(600), &config()).unwrap();
        let principal = validate_token(&token, &config()).unwrap().into_principal();
        assert_eq!(principal.id, "user_2abc");
        assert_eq!(principal.email.as_deref(), Some("pat@example.com"));
        assert!(principal.is_contractor);
        assert!(principal.is_active);
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = encode_token(&claims(-3600), &config()).unwrap();
        assert!(validate_token(&token, &config()).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = encode_token(&claims(600), &config()).unwrap();
        let other = JwtConfig {
            secret: "another-secret".to_string(),
            issuer: None,
        };
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn issuer_is_enforced_when_configured() {
        let token = encode_token(&claims(600), &config()).unwrap();
        let strict = JwtConfig {
            issuer: Some("https://clerk.360method.com".to_string()),
            ..config()
        };
        assert!(validate_token(&token, &strict).is_err());
    }
}
