//! Domain types for ledger operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tabeeb_shared::types::CreditKind;

/// The cause of a balance mutation, recorded on every transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionReason {
    /// Credit applied by redeeming a code.
    Redeem,
    /// Debit from metered video watching.
    ConsumeVideo,
    /// Debit from a one-shot article unlock.
    ConsumeArticle,
    /// Manual correction applied by an admin.
    AdminAdjustment,
}

impl TransactionReason {
    /// Returns the canonical snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Redeem => "redeem",
            Self::ConsumeVideo => "consume_video",
            Self::ConsumeArticle => "consume_article",
            Self::AdminAdjustment => "admin_adjustment",
        }
    }
}

impl std::fmt::Display for TransactionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request to mutate one credit kind of one user's balance.
#[derive(Debug, Clone)]
pub struct DeltaRequest {
    /// The user whose balance changes.
    pub user_id: Uuid,
    /// Which balance column the delta applies to.
    pub kind: CreditKind,
    /// Signed amount; never zero after validation.
    pub delta: i64,
    /// Why the balance changed.
    pub reason: TransactionReason,
    /// The code or resource that triggered the change.
    pub reference: Option<Uuid>,
    /// Free-form note (admin adjustments).
    pub note: Option<String>,
}

/// An immutable ledger entry, as read back from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction ID.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Credit kind the delta applied to.
    pub kind: CreditKind,
    /// Signed amount.
    pub delta: i64,
    /// Cause of the mutation.
    pub reason: TransactionReason,
    /// Triggering code or resource, if any.
    pub reference: Option<Uuid>,
    /// Free-form note, if any.
    pub note: Option<String>,
    /// When the mutation was committed.
    pub created_at: DateTime<Utc>,
}
