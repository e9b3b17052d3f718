//! Ledger error types.

use thiserror::Error;

use tabeeb_shared::types::CreditKind;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A delta of zero is meaningless and would pollute the history.
    #[error("Delta must be non-zero")]
    ZeroDelta,

    /// The resulting balance would be negative.
    #[error("Insufficient {kind} credits: balance {available}, requested {requested}")]
    InsufficientCredits {
        /// The credit kind that ran short.
        kind: CreditKind,
        /// Balance at the time the delta was rejected.
        available: i64,
        /// Absolute amount that was requested.
        requested: i64,
    },

    /// The resulting balance would overflow the storage type.
    #[error("Balance overflow for {0} credits")]
    Overflow(CreditKind),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroDelta => "ZERO_DELTA",
            Self::InsufficientCredits { .. } => "INSUFFICIENT_CREDITS",
            Self::Overflow(_) => "BALANCE_OVERFLOW",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::ZeroDelta => 400,
            Self::InsufficientCredits { .. } => 422,
            Self::Overflow(_) | Self::Database(_) => 500,
        }
    }
}
