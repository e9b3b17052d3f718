//! Integration tests for the ledger repository.
//!
//! Covers the atomic delta guard: non-negativity, transaction append, and
//! concurrent debits against one balance.

mod common;

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Barrier;
use uuid::Uuid;

use tabeeb_core::ledger::{DeltaRequest, LedgerError, LedgerService, TransactionReason};
use tabeeb_db::repositories::LedgerRepository;
use tabeeb_shared::types::{CreditKind, PageRequest};

fn credit(user_id: Uuid, kind: CreditKind, delta: i64) -> DeltaRequest {
    DeltaRequest {
        user_id,
        kind,
        delta,
        reason: TransactionReason::AdminAdjustment,
        reference: None,
        note: Some("test funding".to_string()),
    }
}

#[tokio::test]
async fn test_debit_on_empty_balance_fails_without_transaction() {
    let Some(db) = common::connect_or_skip("test_debit_on_empty_balance_fails_without_transaction").await
    else {
        return;
    };

    let repo = LedgerRepository::new(db);
    let user_id = Uuid::new_v4();

    let result = repo
        .apply_delta(credit(user_id, CreditKind::Universal, -1))
        .await;

    assert_eq!(
        result,
        Err(LedgerError::InsufficientCredits {
            kind: CreditKind::Universal,
            available: 0,
            requested: 1,
        })
    );

    // A rejected delta must leave no trace in the history.
    let history = repo
        .get_history(user_id, PageRequest::default(), None)
        .await
        .expect("history");
    assert!(history.data.is_empty());
    assert_eq!(history.meta.total, 0);
}

#[tokio::test]
async fn test_credit_then_debit_updates_balance_and_history() {
    let Some(db) = common::connect_or_skip("test_credit_then_debit_updates_balance_and_history").await
    else {
        return;
    };

    let repo = LedgerRepository::new(db);
    let user_id = Uuid::new_v4();

    let after_credit = repo
        .apply_delta(credit(user_id, CreditKind::Universal, 50))
        .await
        .expect("credit");
    assert_eq!(after_credit.universal_credits, 50);

    let after_debit = repo
        .apply_delta(credit(user_id, CreditKind::Universal, -20))
        .await
        .expect("debit");
    assert_eq!(after_debit.universal_credits, 30);

    let history = repo
        .get_history(user_id, PageRequest::default(), None)
        .await
        .expect("history");
    assert_eq!(history.meta.total, 2);
    // Reverse chronological: the debit comes first.
    assert_eq!(history.data[0].delta, -20);
    assert_eq!(history.data[1].delta, 50);

    // Round-trip: summing the history reproduces the balance.
    let reconstructed = LedgerService::reconstruct(&history.data);
    assert_eq!(reconstructed, after_debit);
}

#[tokio::test]
async fn test_zero_delta_rejected_before_storage() {
    let Some(db) = common::connect_or_skip("test_zero_delta_rejected_before_storage").await else {
        return;
    };

    let repo = LedgerRepository::new(db);
    let result = repo
        .apply_delta(credit(Uuid::new_v4(), CreditKind::VideoMinutes, 0))
        .await;
    assert_eq!(result, Err(LedgerError::ZeroDelta));
}

#[tokio::test]
async fn test_history_kind_filter_and_pagination() {
    let Some(db) = common::connect_or_skip("test_history_kind_filter_and_pagination").await else {
        return;
    };

    let repo = LedgerRepository::new(db);
    let user_id = Uuid::new_v4();

    for _ in 0..3 {
        repo.apply_delta(credit(user_id, CreditKind::Universal, 10))
            .await
            .expect("credit");
    }
    repo.apply_delta(credit(user_id, CreditKind::VideoMinutes, 15))
        .await
        .expect("credit");

    let universal_only = repo
        .get_history(
            user_id,
            PageRequest { page: 1, per_page: 2 },
            Some(CreditKind::Universal),
        )
        .await
        .expect("history");
    assert_eq!(universal_only.meta.total, 3);
    assert_eq!(universal_only.data.len(), 2);
    assert_eq!(universal_only.meta.total_pages, 2);
    assert!(
        universal_only
            .data
            .iter()
            .all(|tx| tx.kind == CreditKind::Universal)
    );
}

#[tokio::test]
async fn test_concurrent_debits_never_oversell() {
    let Some(db) = common::connect_or_skip("test_concurrent_debits_never_oversell").await else {
        return;
    };

    let repo = LedgerRepository::new(db);
    let user_id = Uuid::new_v4();

    repo.apply_delta(credit(user_id, CreditKind::VideoMinutes, 10))
        .await
        .expect("funding");

    // Ten tasks race to debit 3 minutes each from a balance of 10; at most
    // three can win.
    let barrier = Arc::new(Barrier::new(10));
    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let repo = repo.clone();
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                repo.apply_delta(DeltaRequest {
                    user_id,
                    kind: CreditKind::VideoMinutes,
                    delta: -3,
                    reason: TransactionReason::ConsumeVideo,
                    reference: None,
                    note: None,
                })
                .await
            })
        })
        .collect();

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let rejections = results
        .iter()
        .filter(|r| matches!(r, Err(LedgerError::InsufficientCredits { .. })))
        .count();

    assert_eq!(successes + rejections, 10);
    assert!(successes <= 3, "oversold: {successes} debits of 3 from 10");

    let balance = repo.get_balance(user_id).await.expect("balance");
    let expected = 10 - 3 * i64::try_from(successes).unwrap();
    assert_eq!(balance.video_minutes, expected);
    assert!(balance.video_minutes >= 0);

    // Exactly one transaction per successful debit, plus the funding credit.
    let history = repo
        .get_history(user_id, PageRequest { page: 1, per_page: 50 }, None)
        .await
        .expect("history");
    assert_eq!(history.meta.total, u64::try_from(successes).unwrap() + 1);
}
