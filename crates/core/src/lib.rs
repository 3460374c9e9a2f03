//! Domain core for the 360° Method notification and access service.
//!
//! Everything in this crate is pure: no I/O, no async. The `db` and `api`
//! crates build on these types.

pub mod access;
pub mod audit;
pub mod categories;
pub mod channels;
pub mod delivery;
pub mod error;
pub mod notification_settings;
pub mod preferences;
pub mod principal;
pub mod quiet_hours;
pub mod redirect;
pub mod types;
pub mod user_type;
