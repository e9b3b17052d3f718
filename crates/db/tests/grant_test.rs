//! Integration tests for the consumption gate.
//!
//! Covers idempotent purchases, the compensating delete on a failed debit,
//! and grant-free video metering.

mod common;

use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Barrier;
use uuid::Uuid;

use tabeeb_core::access::{AccessError, PricingPolicy, ResourceKind};
use tabeeb_core::ledger::{DeltaRequest, LedgerError, TransactionReason};
use tabeeb_db::repositories::{GrantRepository, LedgerRepository};
use tabeeb_shared::types::{CreditKind, PageRequest};

fn policy() -> PricingPolicy {
    PricingPolicy::new(1, 50)
}

async fn fund(ledger: &LedgerRepository, user_id: Uuid, kind: CreditKind, amount: i64) {
    ledger
        .apply_delta(DeltaRequest {
            user_id,
            kind,
            delta: amount,
            reason: TransactionReason::AdminAdjustment,
            reference: None,
            note: Some("test funding".to_string()),
        })
        .await
        .expect("funding");
}

#[tokio::test]
async fn test_purchase_is_idempotent() {
    let Some(db) = common::connect_or_skip("test_purchase_is_idempotent").await else {
        return;
    };

    let grants = GrantRepository::new(db.clone());
    let ledger = LedgerRepository::new(db);
    let user_id = Uuid::new_v4();
    let article = Uuid::new_v4();

    fund(&ledger, user_id, CreditKind::ArticleCredits, 2).await;

    let first = grants
        .purchase(user_id, article, ResourceKind::Article, &policy())
        .await
        .expect("first purchase");
    let second = grants
        .purchase(user_id, article, ResourceKind::Article, &policy())
        .await
        .expect("second purchase");

    // One grant, charged once.
    assert_eq!(first.id, second.id);
    let balance = ledger.get_balance(user_id).await.expect("balance");
    assert_eq!(balance.article_credits, 1);

    // Exactly one debiting transaction for the pair.
    let history = ledger
        .get_history(user_id, PageRequest::default(), None)
        .await
        .expect("history");
    let debits = history
        .data
        .iter()
        .filter(|tx| tx.reference == Some(article) && tx.delta < 0)
        .count();
    assert_eq!(debits, 1);
}

#[tokio::test]
async fn test_purchase_without_credits_leaves_no_grant() {
    let Some(db) = common::connect_or_skip("test_purchase_without_credits_leaves_no_grant").await
    else {
        return;
    };

    let grants = GrantRepository::new(db);
    let user_id = Uuid::new_v4();
    let article = Uuid::new_v4();

    let result = grants
        .purchase(user_id, article, ResourceKind::Article, &policy())
        .await;
    assert!(matches!(
        result,
        Err(AccessError::Ledger(LedgerError::InsufficientCredits {
            kind: CreditKind::ArticleCredits,
            available: 0,
            requested: 1,
        }))
    ));

    // The tentative grant was compensated away; access is still locked.
    let decision = grants
        .check_access(user_id, article, ResourceKind::Article, &policy())
        .await
        .expect("check");
    assert!(!decision.granted);
    assert_eq!(decision.price.unwrap().amount, 1);
    assert!(grants.find_grant(user_id, article).await.expect("find").is_none());
}

#[tokio::test]
async fn test_check_access_flips_after_purchase() {
    let Some(db) = common::connect_or_skip("test_check_access_flips_after_purchase").await else {
        return;
    };

    let grants = GrantRepository::new(db.clone());
    let ledger = LedgerRepository::new(db);
    let user_id = Uuid::new_v4();
    let course = Uuid::new_v4();

    fund(&ledger, user_id, CreditKind::Universal, 50).await;

    let before = grants
        .check_access(user_id, course, ResourceKind::Course, &policy())
        .await
        .expect("check");
    assert!(!before.granted);
    assert_eq!(before.price.unwrap().kind, CreditKind::Universal);

    grants
        .purchase(user_id, course, ResourceKind::Course, &policy())
        .await
        .expect("purchase");

    let after = grants
        .check_access(user_id, course, ResourceKind::Course, &policy())
        .await
        .expect("check");
    assert!(after.granted);
    assert!(after.price.is_none());

    // Re-access never re-debits.
    let balance = ledger.get_balance(user_id).await.expect("balance");
    assert_eq!(balance.universal_credits, 0);
}

#[tokio::test]
async fn test_video_metering_scenario() {
    let Some(db) = common::connect_or_skip("test_video_metering_scenario").await else {
        return;
    };

    let grants = GrantRepository::new(db.clone());
    let ledger = LedgerRepository::new(db);
    let user_id = Uuid::new_v4();
    let course = Uuid::new_v4();

    fund(&ledger, user_id, CreditKind::VideoMinutes, 10).await;

    let after = grants
        .consume_video_minutes(user_id, course, 7)
        .await
        .expect("consume");
    assert_eq!(after.video_minutes, 3);

    let result = grants.consume_video_minutes(user_id, course, 5).await;
    assert!(matches!(
        result,
        Err(AccessError::Ledger(LedgerError::InsufficientCredits {
            kind: CreditKind::VideoMinutes,
            available: 3,
            requested: 5,
        }))
    ));

    // Balance unchanged by the failed consume; no grant rows for metering.
    let balance = ledger.get_balance(user_id).await.expect("balance");
    assert_eq!(balance.video_minutes, 3);
    assert!(grants.find_grant(user_id, course).await.expect("find").is_none());
}

#[tokio::test]
async fn test_invalid_minutes_rejected() {
    let Some(db) = common::connect_or_skip("test_invalid_minutes_rejected").await else {
        return;
    };

    let grants = GrantRepository::new(db);
    let result = grants
        .consume_video_minutes(Uuid::new_v4(), Uuid::new_v4(), 0)
        .await;
    assert!(matches!(result, Err(AccessError::InvalidMinutes)));
}

#[tokio::test]
async fn test_concurrent_purchases_charge_once() {
    let Some(db) = common::connect_or_skip("test_concurrent_purchases_charge_once").await else {
        return;
    };

    let grants = GrantRepository::new(db.clone());
    let ledger = LedgerRepository::new(db);
    let user_id = Uuid::new_v4();
    let article = Uuid::new_v4();

    fund(&ledger, user_id, CreditKind::ArticleCredits, 5).await;

    let contenders = 6;
    let barrier = Arc::new(Barrier::new(contenders));
    let tasks: Vec<_> = (0..contenders)
        .map(|_| {
            let grants = grants.clone();
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                grants
                    .purchase(user_id, article, ResourceKind::Article, &policy())
                    .await
            })
        })
        .collect();

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .collect();

    // Every contender ends up holding the same grant.
    let grant_ids: Vec<_> = results
        .iter()
        .map(|r| r.as_ref().expect("purchase").id)
        .collect();
    assert!(grant_ids.iter().all(|id| *id == grant_ids[0]));

    // Charged exactly once despite the stampede.
    let balance = ledger.get_balance(user_id).await.expect("balance");
    assert_eq!(balance.article_credits, 4);
}
