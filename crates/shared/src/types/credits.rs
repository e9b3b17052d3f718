//! Credit kinds, payloads, and balance amounts.
//!
//! All credit quantities are integral `i64` counters. The three kinds are
//! independent balances with independent consumption paths; nothing here
//! converts between kinds.

use serde::{Deserialize, Serialize};

/// The kind of credit a balance column or ledger delta refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditKind {
    /// General-purpose credits, spendable on course unlocks.
    Universal,
    /// Metered video watch-time minutes.
    VideoMinutes,
    /// One-shot article unlock credits.
    ArticleCredits,
}

impl CreditKind {
    /// All credit kinds, in display order.
    pub const ALL: [Self; 3] = [Self::Universal, Self::VideoMinutes, Self::ArticleCredits];

    /// Returns the canonical snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Universal => "universal",
            Self::VideoMinutes => "video_minutes",
            Self::ArticleCredits => "article_credits",
        }
    }
}

impl std::fmt::Display for CreditKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CreditKind {
    type Err = UnknownCreditKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "universal" => Ok(Self::Universal),
            "video_minutes" => Ok(Self::VideoMinutes),
            "article_credits" => Ok(Self::ArticleCredits),
            other => Err(UnknownCreditKind(other.to_string())),
        }
    }
}

/// Error returned when parsing an unknown credit kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown credit kind: {0}")]
pub struct UnknownCreditKind(pub String);

/// A credit payload carried by a redemption code: how much of each kind the
/// code is worth. Components are non-negative; at least one must be positive
/// for the payload to be redeemable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditPayload {
    /// Universal credits granted.
    #[serde(default)]
    pub universal_credits: i64,
    /// Video minutes granted.
    #[serde(default)]
    pub video_minutes: i64,
    /// Article credits granted.
    #[serde(default)]
    pub article_credits: i64,
}

impl CreditPayload {
    /// Returns the amount for a given kind.
    #[must_use]
    pub const fn get(&self, kind: CreditKind) -> i64 {
        match kind {
            CreditKind::Universal => self.universal_credits,
            CreditKind::VideoMinutes => self.video_minutes,
            CreditKind::ArticleCredits => self.article_credits,
        }
    }

    /// Returns true if every component is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.universal_credits == 0 && self.video_minutes == 0 && self.article_credits == 0
    }

    /// Returns true if any component is negative.
    #[must_use]
    pub const fn has_negative_component(&self) -> bool {
        self.universal_credits < 0 || self.video_minutes < 0 || self.article_credits < 0
    }

    /// Iterates over the non-zero (kind, amount) components.
    pub fn components(&self) -> impl Iterator<Item = (CreditKind, i64)> + '_ {
        CreditKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|&(_, amount)| amount != 0)
    }
}

/// A user's current balance across all credit kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAmounts {
    /// Universal credit balance.
    pub universal_credits: i64,
    /// Remaining video minutes.
    pub video_minutes: i64,
    /// Remaining article credits.
    pub article_credits: i64,
}

impl BalanceAmounts {
    /// The zero balance (default for users without a balance row).
    pub const ZERO: Self = Self {
        universal_credits: 0,
        video_minutes: 0,
        article_credits: 0,
    };

    /// Returns the balance for a given kind.
    #[must_use]
    pub const fn get(&self, kind: CreditKind) -> i64 {
        match kind {
            CreditKind::Universal => self.universal_credits,
            CreditKind::VideoMinutes => self.video_minutes,
            CreditKind::ArticleCredits => self.article_credits,
        }
    }

    /// Returns a copy with the given kind replaced.
    #[must_use]
    pub const fn with(mut self, kind: CreditKind, amount: i64) -> Self {
        match kind {
            CreditKind::Universal => self.universal_credits = amount,
            CreditKind::VideoMinutes => self.video_minutes = amount,
            CreditKind::ArticleCredits => self.article_credits = amount,
        }
        self
    }

    /// Applies a signed delta to one kind.
    ///
    /// Returns `None` if the result would be negative or overflow; the
    /// balance is unchanged in that case.
    #[must_use]
    pub fn checked_apply(&self, kind: CreditKind, delta: i64) -> Option<Self> {
        let updated = self.get(kind).checked_add(delta)?;
        if updated < 0 {
            return None;
        }
        Some(self.with(kind, updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_kind_round_trip() {
        for kind in CreditKind::ALL {
            assert_eq!(CreditKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert!(CreditKind::from_str("gold").is_err());
    }

    #[test]
    fn test_payload_components_skip_zeroes() {
        let payload = CreditPayload {
            universal_credits: 50,
            video_minutes: 0,
            article_credits: 3,
        };
        let components: Vec<_> = payload.components().collect();
        assert_eq!(
            components,
            vec![
                (CreditKind::Universal, 50),
                (CreditKind::ArticleCredits, 3)
            ]
        );
    }

    #[test]
    fn test_payload_emptiness() {
        assert!(CreditPayload::default().is_empty());
        assert!(
            !CreditPayload {
                video_minutes: 1,
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn test_checked_apply_rejects_negative_result() {
        let balance = BalanceAmounts::ZERO;
        assert_eq!(balance.checked_apply(CreditKind::Universal, -1), None);

        let funded = balance.with(CreditKind::Universal, 10);
        let spent = funded.checked_apply(CreditKind::Universal, -10).unwrap();
        assert_eq!(spent.universal_credits, 0);
    }

    #[test]
    fn test_checked_apply_rejects_overflow() {
        let balance = BalanceAmounts::ZERO.with(CreditKind::VideoMinutes, i64::MAX);
        assert_eq!(balance.checked_apply(CreditKind::VideoMinutes, 1), None);
    }

    #[test]
    fn test_checked_apply_leaves_other_kinds_untouched() {
        let balance = BalanceAmounts {
            universal_credits: 5,
            video_minutes: 10,
            article_credits: 2,
        };
        let updated = balance
            .checked_apply(CreditKind::VideoMinutes, -7)
            .unwrap();
        assert_eq!(updated.video_minutes, 3);
        assert_eq!(updated.universal_credits, 5);
        assert_eq!(updated.article_credits, 2);
    }
}
