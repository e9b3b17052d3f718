//! Pure ledger rules: delta validation, balance projection, reconstruction.
//!
//! Nothing here touches storage. The db crate enforces the same non-negativity
//! rule a second time with a conditional UPDATE; this service exists so the
//! rule is testable without a database and so callers can reject bad input
//! before paying for a round trip.

use tabeeb_shared::types::{BalanceAmounts, CreditKind};

use super::error::LedgerError;
use super::types::TransactionRecord;

/// Ledger service for balance projection and validation.
pub struct LedgerService;

impl LedgerService {
    /// Validates a signed delta before it is sent to storage.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ZeroDelta` for a zero delta.
    pub const fn validate_delta(delta: i64) -> Result<(), LedgerError> {
        if delta == 0 {
            return Err(LedgerError::ZeroDelta);
        }
        Ok(())
    }

    /// Projects a delta onto a balance, enforcing non-negativity.
    ///
    /// This is the in-memory twin of the storage-side conditional UPDATE;
    /// both must agree on what is allowed.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InsufficientCredits` if the resulting balance
    /// would be negative, `LedgerError::Overflow` on arithmetic overflow.
    pub fn project(
        balance: BalanceAmounts,
        kind: CreditKind,
        delta: i64,
    ) -> Result<BalanceAmounts, LedgerError> {
        Self::validate_delta(delta)?;

        balance.checked_apply(kind, delta).ok_or_else(|| {
            // Balances are non-negative, so a negative delta can only fail by
            // driving the balance below zero and a positive one by overflow.
            if delta < 0 {
                LedgerError::InsufficientCredits {
                    kind,
                    available: balance.get(kind),
                    requested: delta.unsigned_abs().try_into().unwrap_or(i64::MAX),
                }
            } else {
                LedgerError::Overflow(kind)
            }
        })
    }

    /// Reconstructs a balance from a user's full transaction history.
    ///
    /// The ledger invariant: for every kind, the stored balance equals the
    /// sum of all transaction deltas of that kind. Used by reconciliation
    /// tooling and tests.
    #[must_use]
    pub fn reconstruct(transactions: &[TransactionRecord]) -> BalanceAmounts {
        transactions.iter().fold(BalanceAmounts::ZERO, |acc, tx| {
            let updated = acc.get(tx.kind).saturating_add(tx.delta);
            acc.with(tx.kind, updated)
        })
    }
}
