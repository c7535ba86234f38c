//! Core business logic, framework-agnostic and transaction-scoped.
//!
//! Each submodule owns one piece of shared mutable state and exposes the
//! only operations allowed to touch it.

/// Layered staff availability resolution
pub mod availability;
/// Credit ledger - atomic balance deltas and low-balance notifications
pub mod credits;
/// Paired order/listing creation
pub mod orders;
/// Idempotent payout application
pub mod payouts;
/// Time-off request workflow and its side effects
pub mod time_off;
