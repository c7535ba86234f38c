//! Unified error type for all core operations.
//!
//! Variants carry enough context to report the failure without a follow-up
//! query. "Already completed" payout retries are deliberately not an error;
//! [`crate::core::payouts::complete_job_payouts`] reports them as success.

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration or caller input
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what was invalid
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Amount is zero, NaN, or infinite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A deduction would drive the agent's balance below zero
    #[error("Insufficient credits: balance {current}, required {required}")]
    InsufficientCredits {
        /// Balance at the time the deduction was attempted
        current: f64,
        /// Amount the deduction needed
        required: f64,
    },

    /// Referenced agent does not exist
    #[error("Agent {id} not found")]
    AgentNotFound {
        /// Agent primary key
        id: i64,
    },

    /// Referenced staff member does not exist
    #[error("Staff member {id} not found")]
    StaffNotFound {
        /// Staff primary key
        id: i64,
    },

    /// Referenced credit package does not exist or is inactive
    #[error("Credit package {id} not found")]
    PackageNotFound {
        /// Package primary key
        id: i64,
    },

    /// `complete_job_payouts` called without a prior lock acquisition
    #[error("No payout lock found for idempotency key '{key}'")]
    PayoutLockNotFound {
        /// The idempotency key the caller supplied
        key: String,
    },

    /// A payout attempt under this key already failed; retry needs a new key
    #[error("Payout for idempotency key '{key}' previously failed: {message}")]
    PayoutPreviouslyFailed {
        /// The idempotency key the caller supplied
        key: String,
        /// Error captured from the failed attempt
        message: String,
    },

    /// Illegal time-off request status transition
    #[error("Invalid time-off transition from '{from}' to '{to}'")]
    InvalidTransition {
        /// Current status of the request
        from: String,
        /// Status the caller asked for
        to: String,
    },
}

// Convenience `Result` type
/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;
