//! Database seeder for Tabeeb development and testing.
//!
//! Seeds a demo GIFT code batch and a funded demo user so the frontend has
//! something to redeem and spend against locally.
//!
//! Usage: cargo run --bin seeder

use uuid::Uuid;

use tabeeb_core::codes::BatchRequest;
use tabeeb_core::ledger::{DeltaRequest, TransactionReason};
use tabeeb_db::repositories::{CodeRepository, LedgerRepository};
use tabeeb_shared::config::CodesConfig;
use tabeeb_shared::types::{CreditKind, CreditPayload};

/// Demo admin user ID (consistent for all seeds)
const DEMO_ADMIN_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo member user ID (consistent for all seeds)
const DEMO_USER_ID: &str = "00000000-0000-0000-0000-000000000002";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = tabeeb_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo code batch...");
    seed_demo_codes(&db).await;

    println!("Seeding demo balance...");
    seed_demo_balance(&db).await;

    println!("Seeding complete!");
}

fn demo_admin_id() -> Uuid {
    Uuid::parse_str(DEMO_ADMIN_ID).unwrap()
}

fn demo_user_id() -> Uuid {
    Uuid::parse_str(DEMO_USER_ID).unwrap()
}

async fn seed_demo_codes(db: &sea_orm::DatabaseConnection) {
    let repo = CodeRepository::new(db.clone());
    let config = CodesConfig::default();

    let batch = repo
        .generate_batch(
            &BatchRequest {
                amount: 5,
                prefix: "GIFT".to_string(),
                payload: CreditPayload {
                    universal_credits: 50,
                    video_minutes: 60,
                    article_credits: 3,
                },
                expires_at: None,
                created_by: demo_admin_id(),
            },
            &config,
        )
        .await
        .expect("Failed to seed codes");

    for code in &batch {
        println!("  {}", code.code);
    }
}

async fn seed_demo_balance(db: &sea_orm::DatabaseConnection) {
    let repo = LedgerRepository::new(db.clone());

    for (kind, amount) in [
        (CreditKind::Universal, 100),
        (CreditKind::VideoMinutes, 120),
        (CreditKind::ArticleCredits, 5),
    ] {
        repo.apply_delta(DeltaRequest {
            user_id: demo_user_id(),
            kind,
            delta: amount,
            reason: TransactionReason::AdminAdjustment,
            reference: None,
            note: Some("dev seed".to_string()),
        })
        .await
        .expect("Failed to seed balance");
    }
}
