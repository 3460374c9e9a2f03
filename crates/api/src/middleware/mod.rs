//! Authentication extractors.
//!
//! - [`auth::AuthUser`] -- Requires a principal resolved from the Bearer token.
//! - [`auth::MaybeAuthUser`] -- Resolves a principal when one is present.

pub mod auth;
