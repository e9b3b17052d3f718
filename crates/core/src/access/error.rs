//! Consumption gate error types.

use thiserror::Error;

use crate::ledger::LedgerError;

/// Errors that can occur in the consumption gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// Metered consumption must request at least one minute.
    #[error("Minutes must be positive")]
    InvalidMinutes,

    /// The underlying ledger debit failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error outside the ledger (grant insert/delete, lookups).
    #[error("Database error: {0}")]
    Database(String),
}

impl AccessError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMinutes => "INVALID_MINUTES",
            Self::Ledger(inner) => inner.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidMinutes => 400,
            Self::Ledger(inner) => inner.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabeeb_shared::types::CreditKind;

    #[test]
    fn test_ledger_errors_pass_through() {
        let err = AccessError::from(LedgerError::InsufficientCredits {
            kind: CreditKind::ArticleCredits,
            available: 0,
            requested: 1,
        });
        assert_eq!(err.error_code(), "INSUFFICIENT_CREDITS");
        assert_eq!(err.http_status_code(), 422);
    }

    #[test]
    fn test_invalid_minutes_is_bad_request() {
        assert_eq!(AccessError::InvalidMinutes.http_status_code(), 400);
        assert_eq!(AccessError::InvalidMinutes.error_code(), "INVALID_MINUTES");
    }
}
