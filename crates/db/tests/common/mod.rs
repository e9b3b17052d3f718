//! Shared setup for integration tests.
//!
//! Tests run against the database in `DATABASE_URL` (or
//! `TABEEB__DATABASE__URL`) and are skipped when neither is set, so the
//! suite stays green on machines without Postgres.

use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::env;
use tokio::sync::OnceCell;

use tabeeb_db::migration::Migrator;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

fn database_url() -> Option<String> {
    env::var("DATABASE_URL")
        .or_else(|_| env::var("TABEEB__DATABASE__URL"))
        .ok()
}

/// Connects and migrates, or returns `None` to skip the test.
pub async fn connect_or_skip(test_name: &str) -> Option<DatabaseConnection> {
    let Some(url) = database_url() else {
        eprintln!("skipping {test_name}: DATABASE_URL not set");
        return None;
    };

    let db = Database::connect(&url)
        .await
        .expect("Failed to connect to database");

    MIGRATED
        .get_or_init(|| async {
            Migrator::up(&db, None)
                .await
                .expect("Failed to run migrations");
        })
        .await;

    Some(db)
}
