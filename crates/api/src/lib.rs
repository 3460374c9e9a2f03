//! 360° Method notification and access API.
//!
//! Exposes the building blocks (config, state, error handling, services,
//! routes) so integration tests and the binary entrypoint can both use them.

pub mod access;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod notifications;
pub mod router;
pub mod routes;
pub mod state;
