//! Notification preference resolution.
//!
//! [`PreferenceResolver`] owns the read-materialize-upsert flows for
//! per-category preferences and user-wide settings, and answers whether a
//! notification should go out on a given channel.

pub mod resolver;

pub use resolver::PreferenceResolver;
