//! Code registry error types.

use thiserror::Error;

/// Errors that can occur during code registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// No code with that token exists.
    #[error("Code not found")]
    NotFound,

    /// The code was already redeemed (possibly by someone else, possibly in a
    /// race this caller just lost).
    #[error("Code already used")]
    AlreadyRedeemed,

    /// The code expired before redemption.
    #[error("Code has expired")]
    Expired,

    /// The code was revoked by an admin.
    #[error("Code has been revoked")]
    Revoked,

    /// Batch amount out of range.
    #[error("Batch amount {amount} out of range (1..={max})")]
    InvalidAmount {
        /// Requested amount.
        amount: u32,
        /// Configured ceiling.
        max: u32,
    },

    /// Prefix is not 2-12 uppercase alphanumeric characters.
    #[error("Prefix must be 2-12 characters A-Z or 0-9")]
    InvalidPrefix,

    /// The payload grants nothing.
    #[error("Payload must grant at least one credit")]
    EmptyPayload,

    /// The payload has a negative component.
    #[error("Payload components must be non-negative")]
    NegativePayload,

    /// Could not find an unused token after the configured retries.
    #[error("Code generation exhausted after {attempts} attempts")]
    GenerationExhausted {
        /// Attempts made for the failing code.
        attempts: u32,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl CodeError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound => "CODE_NOT_FOUND",
            Self::AlreadyRedeemed => "CODE_ALREADY_USED",
            Self::Expired => "CODE_EXPIRED",
            Self::Revoked => "CODE_REVOKED",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::InvalidPrefix => "INVALID_PREFIX",
            Self::EmptyPayload => "EMPTY_PAYLOAD",
            Self::NegativePayload => "NEGATIVE_PAYLOAD",
            Self::GenerationExhausted { .. } => "GENERATION_EXHAUSTED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::AlreadyRedeemed => 409,
            Self::Expired | Self::Revoked => 410,
            Self::InvalidAmount { .. }
            | Self::InvalidPrefix
            | Self::EmptyPayload
            | Self::NegativePayload => 400,
            Self::GenerationExhausted { .. } | Self::Database(_) => 500,
        }
    }
}
