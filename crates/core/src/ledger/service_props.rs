//! Property-based tests for ledger projection.

use proptest::prelude::*;

use tabeeb_shared::types::{BalanceAmounts, CreditKind};

use super::error::LedgerError;
use super::service::LedgerService;

fn kind_strategy() -> impl Strategy<Value = CreditKind> {
    prop_oneof![
        Just(CreditKind::Universal),
        Just(CreditKind::VideoMinutes),
        Just(CreditKind::ArticleCredits),
    ]
}

proptest! {
    /// Applying any sequence of deltas never produces a negative balance:
    /// a delta either applies cleanly or is rejected leaving the balance
    /// untouched.
    #[test]
    fn test_balance_never_negative(
        deltas in prop::collection::vec((kind_strategy(), -1_000i64..1_000), 0..64),
    ) {
        let mut balance = BalanceAmounts::ZERO;

        for (kind, delta) in deltas {
            match LedgerService::project(balance, kind, delta) {
                Ok(updated) => balance = updated,
                Err(_) => { /* rejected deltas leave the balance untouched */ }
            }

            for k in CreditKind::ALL {
                prop_assert!(balance.get(k) >= 0);
            }
        }
    }

    /// The final balance equals the sum of the deltas that were accepted,
    /// and the rejection count equals attempted minus applied.
    #[test]
    fn test_final_balance_is_sum_of_applied_deltas(
        deltas in prop::collection::vec(-500i64..500, 1..64),
    ) {
        let kind = CreditKind::Universal;
        let mut balance = BalanceAmounts::ZERO;
        let mut applied_sum = 0i64;
        let mut applied = 0usize;
        let mut rejected = 0usize;
        let mut attempted = 0usize;

        for delta in &deltas {
            if *delta == 0 {
                // Zero deltas are invalid input, not balance rejections.
                prop_assert_eq!(
                    LedgerService::project(balance, kind, 0),
                    Err(LedgerError::ZeroDelta)
                );
                continue;
            }
            attempted += 1;
            match LedgerService::project(balance, kind, *delta) {
                Ok(updated) => {
                    balance = updated;
                    applied_sum += *delta;
                    applied += 1;
                }
                Err(LedgerError::InsufficientCredits { .. }) => rejected += 1,
                Err(e) => prop_assert!(false, "unexpected error: {e}"),
            }
        }

        prop_assert_eq!(balance.get(kind), applied_sum);
        prop_assert_eq!(rejected, attempted - applied);
    }

    /// A debit is rejected exactly when it exceeds the available balance.
    #[test]
    fn test_debit_rejection_boundary(
        available in 0i64..10_000,
        debit in 1i64..10_000,
        kind in kind_strategy(),
    ) {
        let balance = BalanceAmounts::ZERO.with(kind, available);
        let result = LedgerService::project(balance, kind, -debit);

        if debit <= available {
            prop_assert_eq!(result.unwrap().get(kind), available - debit);
        } else {
            prop_assert_eq!(result, Err(LedgerError::InsufficientCredits {
                kind,
                available,
                requested: debit,
            }));
        }
    }

    /// Projection touches only the targeted kind.
    #[test]
    fn test_projection_is_kind_local(
        universal in 0i64..1_000,
        video in 0i64..1_000,
        article in 0i64..1_000,
        delta in 1i64..1_000,
    ) {
        let balance = BalanceAmounts {
            universal_credits: universal,
            video_minutes: video,
            article_credits: article,
        };

        let updated = LedgerService::project(balance, CreditKind::VideoMinutes, delta).unwrap();
        prop_assert_eq!(updated.universal_credits, universal);
        prop_assert_eq!(updated.article_credits, article);
        prop_assert_eq!(updated.video_minutes, video + delta);
    }
}
