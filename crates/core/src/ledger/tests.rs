//! Unit tests for ledger projection and reconstruction.

use chrono::Utc;
use uuid::Uuid;

use tabeeb_shared::types::{BalanceAmounts, CreditKind};

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{TransactionReason, TransactionRecord};

fn tx(kind: CreditKind, delta: i64, reason: TransactionReason) -> TransactionRecord {
    TransactionRecord {
        id: Uuid::now_v7(),
        user_id: Uuid::new_v4(),
        kind,
        delta,
        reason,
        reference: None,
        note: None,
        created_at: Utc::now(),
    }
}

#[test]
fn test_zero_delta_rejected() {
    assert_eq!(
        LedgerService::validate_delta(0),
        Err(LedgerError::ZeroDelta)
    );
    assert!(LedgerService::validate_delta(-1).is_ok());
    assert!(LedgerService::validate_delta(1).is_ok());
}

#[test]
fn test_debit_on_zero_balance_fails() {
    let result = LedgerService::project(BalanceAmounts::ZERO, CreditKind::Universal, -1);
    assert_eq!(
        result,
        Err(LedgerError::InsufficientCredits {
            kind: CreditKind::Universal,
            available: 0,
            requested: 1,
        })
    );
}

#[test]
fn test_exact_spend_reaches_zero() {
    let balance = BalanceAmounts::ZERO.with(CreditKind::ArticleCredits, 3);
    let updated = LedgerService::project(balance, CreditKind::ArticleCredits, -3).unwrap();
    assert_eq!(updated.article_credits, 0);
}

#[test]
fn test_video_metering_scenario() {
    // 10 minutes, watch 7, then try 5 more.
    let balance = BalanceAmounts::ZERO.with(CreditKind::VideoMinutes, 10);

    let after = LedgerService::project(balance, CreditKind::VideoMinutes, -7).unwrap();
    assert_eq!(after.video_minutes, 3);

    let result = LedgerService::project(after, CreditKind::VideoMinutes, -5);
    assert_eq!(
        result,
        Err(LedgerError::InsufficientCredits {
            kind: CreditKind::VideoMinutes,
            available: 3,
            requested: 5,
        })
    );
}

#[test]
fn test_credit_overflow_detected() {
    let balance = BalanceAmounts::ZERO.with(CreditKind::Universal, i64::MAX);
    assert_eq!(
        LedgerService::project(balance, CreditKind::Universal, 1),
        Err(LedgerError::Overflow(CreditKind::Universal))
    );
}

#[test]
fn test_reconstruct_sums_per_kind() {
    let history = vec![
        tx(CreditKind::Universal, 50, TransactionReason::Redeem),
        tx(CreditKind::VideoMinutes, 30, TransactionReason::Redeem),
        tx(CreditKind::VideoMinutes, -7, TransactionReason::ConsumeVideo),
        tx(CreditKind::Universal, -50, TransactionReason::ConsumeArticle),
        tx(CreditKind::ArticleCredits, 2, TransactionReason::AdminAdjustment),
    ];

    let balance = LedgerService::reconstruct(&history);
    assert_eq!(balance.universal_credits, 0);
    assert_eq!(balance.video_minutes, 23);
    assert_eq!(balance.article_credits, 2);
}

#[test]
fn test_reconstruct_empty_history_is_zero() {
    assert_eq!(LedgerService::reconstruct(&[]), BalanceAmounts::ZERO);
}
