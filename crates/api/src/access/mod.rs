//! Route access gating.
//!
//! [`AccessGate`] wraps the pure decision logic in
//! [`threesixty_core::access`] with best-effort audit logging.

pub mod gate;

pub use gate::AccessGate;
