//! Error types for foreman
//!
//! Store communication failures are the only hard errors in the system;
//! contested leadership and empty-queue timeouts are ordinary outcomes and
//! are modeled as values, not errors.

use thiserror::Error;

/// Primary error type for all foreman operations
#[derive(Debug, Error)]
pub enum ForemanError {
    /// A store command failed at the I/O or protocol level
    #[error("store operation failed: {message}")]
    Store { message: String },

    /// Establishing the store connection failed
    #[error("connection to {endpoint} failed: {reason}")]
    Connection { endpoint: String, reason: String },
}

/// Result type alias for foreman operations
pub type Result<T> = std::result::Result<T, ForemanError>;
