//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! All mutations with atomicity requirements (the code status flip, balance
//! deltas, grant insertion) are expressed as conditional updates or
//! insert-if-absent against Postgres, never as read-modify-write in
//! application code: multiple server instances may run concurrently and the
//! storage layer is the only shared arbiter.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{CodeRepository, GrantRepository, LedgerRepository, ReportRepository};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
