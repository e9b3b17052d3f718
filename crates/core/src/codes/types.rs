//! Domain types for the code registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tabeeb_shared::types::CreditPayload;

use super::error::CodeError;

/// Lifecycle status of a redemption code.
///
/// `Unused -> Redeemed` happens exactly once; `Expired` and `Revoked` are
/// administrative terminal states reachable only from `Unused`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeStatus {
    /// Never redeemed; eligible if not past its expiry.
    Unused,
    /// Redeemed by exactly one user.
    Redeemed,
    /// Marked expired by an admin (or past `expires_at` at redeem time).
    Expired,
    /// Withdrawn by an admin before use.
    Revoked,
}

impl CodeStatus {
    /// Returns the canonical snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unused => "unused",
            Self::Redeemed => "redeemed",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        }
    }

    /// Classifies why a code in this state cannot be redeemed now.
    ///
    /// # Errors
    ///
    /// Always returns the matching `CodeError` except for an `Unused` code
    /// within its validity window, which returns `Ok(())`.
    pub fn check_redeemable(
        self,
        expires_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(), CodeError> {
        match self {
            Self::Redeemed => Err(CodeError::AlreadyRedeemed),
            Self::Revoked => Err(CodeError::Revoked),
            Self::Expired => Err(CodeError::Expired),
            Self::Unused => match expires_at {
                Some(expiry) if expiry <= now => Err(CodeError::Expired),
                _ => Ok(()),
            },
        }
    }
}

impl std::fmt::Display for CodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request to generate a batch of codes.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Number of codes to generate.
    pub amount: u32,
    /// Uppercase alphanumeric prefix shared by the batch.
    pub prefix: String,
    /// Credit payload carried by every code in the batch.
    pub payload: CreditPayload,
    /// Optional expiry applied to every code.
    pub expires_at: Option<DateTime<Utc>>,
    /// Admin who requested the batch.
    pub created_by: Uuid,
}

impl BatchRequest {
    /// Validates amount, prefix, and payload against the configured limits.
    ///
    /// # Errors
    ///
    /// Returns `CodeError::InvalidAmount` when `amount` is zero or exceeds
    /// `max_batch_size`, `CodeError::InvalidPrefix` for a malformed prefix,
    /// and `CodeError::EmptyPayload` when the payload grants nothing.
    pub fn validate(&self, max_batch_size: u32) -> Result<(), CodeError> {
        if self.amount == 0 || self.amount > max_batch_size {
            return Err(CodeError::InvalidAmount {
                amount: self.amount,
                max: max_batch_size,
            });
        }

        super::generator::validate_prefix(&self.prefix)?;

        if self.payload.has_negative_component() {
            return Err(CodeError::NegativePayload);
        }
        if self.payload.is_empty() {
            return Err(CodeError::EmptyPayload);
        }

        Ok(())
    }
}
