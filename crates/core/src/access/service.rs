//! Pricing policy for one-shot unlocks and metered video consumption.

use tabeeb_shared::config::CodesConfig;
use tabeeb_shared::types::CreditKind;

use crate::ledger::TransactionReason;

use super::error::AccessError;
use super::types::{Price, ResourceKind};

/// Maps resource kinds to prices and debit kinds.
///
/// Each resource kind draws from exactly one credit kind; there is no
/// fallback between kinds. Prices come from configuration because the
/// catalog (articles, courses) lives in an external system that has no
/// per-item pricing today.
#[derive(Debug, Clone, Copy)]
pub struct PricingPolicy {
    article_price: i64,
    course_price: i64,
}

impl PricingPolicy {
    /// Creates a policy from the configured prices.
    #[must_use]
    pub const fn new(article_price: i64, course_price: i64) -> Self {
        Self {
            article_price,
            course_price,
        }
    }

    /// Creates a policy from the codes configuration section.
    #[must_use]
    pub const fn from_config(config: &CodesConfig) -> Self {
        Self::new(config.article_price, config.course_price)
    }

    /// The credit kind a resource kind debits.
    #[must_use]
    pub const fn debit_kind(kind: ResourceKind) -> CreditKind {
        match kind {
            ResourceKind::Article => CreditKind::ArticleCredits,
            ResourceKind::Course => CreditKind::Universal,
        }
    }

    /// The transaction reason recorded for a one-shot unlock.
    #[must_use]
    pub const fn reason(kind: ResourceKind) -> TransactionReason {
        match kind {
            ResourceKind::Article => TransactionReason::ConsumeArticle,
            ResourceKind::Course => TransactionReason::ConsumeVideo,
        }
    }

    /// The price of unlocking a resource of the given kind.
    #[must_use]
    pub const fn price(&self, kind: ResourceKind) -> Price {
        let amount = match kind {
            ResourceKind::Article => self.article_price,
            ResourceKind::Course => self.course_price,
        };
        Price {
            kind: Self::debit_kind(kind),
            amount,
        }
    }

    /// Validates a metered video consumption request.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::InvalidMinutes` unless `minutes > 0`.
    pub const fn validate_minutes(minutes: i64) -> Result<(), AccessError> {
        if minutes <= 0 {
            return Err(AccessError::InvalidMinutes);
        }
        Ok(())
    }
}
