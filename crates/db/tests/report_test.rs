//! Integration tests for the report repository.

mod common;

use chrono::Utc;
use rand::Rng;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

use tabeeb_core::access::{PricingPolicy, ResourceKind};
use tabeeb_core::codes::BatchRequest;
use tabeeb_core::report::LicenseReportFilter;
use tabeeb_db::entities::{quiz_attempts, redemption_codes, sea_orm_active_enums::CodeStatus};
use tabeeb_db::repositories::{CodeRepository, GrantRepository, LedgerRepository, ReportRepository};
use tabeeb_shared::config::CodesConfig;
use tabeeb_shared::types::{CreditPayload, PageRequest};

/// A fresh prefix per test run keeps report queries isolated from rows left
/// behind by earlier runs against the same database.
fn random_prefix() -> String {
    let mut rng = rand::rng();
    let mut prefix = String::from("RPT");
    for _ in 0..6 {
        let index = rng.random_range(0..26);
        prefix.push(char::from(b'A' + index));
    }
    prefix
}

#[tokio::test]
async fn test_license_report_joins_grants_and_quizzes() {
    let Some(db) = common::connect_or_skip("test_license_report_joins_grants_and_quizzes").await
    else {
        return;
    };

    let codes = CodeRepository::new(db.clone());
    let grants = GrantRepository::new(db.clone());
    let reports = ReportRepository::new(db.clone());
    let config = CodesConfig::default();

    let prefix = random_prefix();
    let batch = codes
        .generate_batch(
            &BatchRequest {
                amount: 2,
                prefix: prefix.clone(),
                payload: CreditPayload {
                    universal_credits: 100,
                    ..Default::default()
                },
                expires_at: None,
                created_by: Uuid::new_v4(),
            },
            &config,
        )
        .await
        .expect("generate");

    let user_id = Uuid::new_v4();
    codes.redeem(&batch[0].code, user_id).await.expect("redeem");

    // The redeemed credits buy a course unlock; the quiz subsystem records
    // two attempts for it.
    let course_id = Uuid::new_v4();
    grants
        .purchase(user_id, course_id, ResourceKind::Course, &PricingPolicy::new(1, 50))
        .await
        .expect("purchase");

    for (score, passed) in [(55, false), (80, true)] {
        quiz_attempts::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            course_id: Set(course_id),
            score: Set(score),
            passed: Set(passed),
            attempted_at: Set(Utc::now().into()),
        }
        .insert(&db)
        .await
        .expect("quiz attempt");
    }

    let report = reports
        .license_report(
            &LicenseReportFilter {
                prefix: Some(prefix),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .expect("report");

    // Only the redeemed code appears; the unused sibling does not.
    assert_eq!(report.meta.total, 1);
    let row = &report.data[0];
    assert_eq!(row.redeemed_by, user_id);
    assert_eq!(row.payload.universal_credits, 100);
    assert!(!row.degraded);
    assert!(row.grants.iter().any(|g| g.resource_id == course_id));

    let outcome = row
        .quiz_outcomes
        .iter()
        .find(|q| q.course_id == course_id)
        .expect("quiz outcome");
    assert_eq!(outcome.best_score, 80);
    assert!(outcome.passed);
    assert_eq!(outcome.attempts, 2);
}

#[tokio::test]
async fn test_license_report_rejects_inverted_range() {
    let Some(db) = common::connect_or_skip("test_license_report_rejects_inverted_range").await
    else {
        return;
    };

    let reports = ReportRepository::new(db);
    let now = Utc::now();

    let result = reports
        .license_report(
            &LicenseReportFilter {
                redeemed_from: Some(now),
                redeemed_to: Some(now - chrono::Duration::days(1)),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_reconciliation_flags_redeemed_code_without_credit() {
    let Some(db) =
        common::connect_or_skip("test_reconciliation_flags_redeemed_code_without_credit").await
    else {
        return;
    };

    let codes = CodeRepository::new(db.clone());
    let ledger = LedgerRepository::new(db.clone());
    let reports = ReportRepository::new(db.clone());
    let config = CodesConfig::default();

    let prefix = random_prefix();
    let batch = codes
        .generate_batch(
            &BatchRequest {
                amount: 2,
                prefix,
                payload: CreditPayload {
                    video_minutes: 30,
                    ..Default::default()
                },
                expires_at: None,
                created_by: Uuid::new_v4(),
            },
            &config,
        )
        .await
        .expect("generate");

    // Simulate a redeem cut short after the status flip: mark the code
    // redeemed directly, writing no ledger transaction.
    let orphan_user = Uuid::new_v4();
    redemption_codes::ActiveModel {
        id: Set(batch[0].id),
        status: Set(CodeStatus::Redeemed),
        redeemed_by: Set(Some(orphan_user)),
        redeemed_at: Set(Some(Utc::now().into())),
        ..Default::default()
    }
    .update(&db)
    .await
    .expect("orphan flip");

    // A cleanly redeemed sibling for contrast.
    let clean_user = Uuid::new_v4();
    codes.redeem(&batch[1].code, clean_user).await.expect("redeem");
    ledger.get_balance(clean_user).await.expect("balance");

    let report = reports
        .reconciliation(PageRequest {
            page: 1,
            per_page: 100,
        })
        .await
        .expect("reconciliation");

    assert!(
        report.data.iter().any(|row| row.code_id == batch[0].id),
        "orphaned code must be flagged"
    );
    assert!(
        report.data.iter().all(|row| row.code_id != batch[1].id),
        "cleanly redeemed code must not be flagged"
    );
}
