//! Identity resolution.
//!
//! - [`jwt`] -- HS256 session-token validation and claim mapping.
//! - [`identity`] -- the [`IdentityProvider`] seam (`auth.me()`).

pub mod identity;
pub mod jwt;

pub use identity::{IdentityProvider, JwtIdentityProvider};
