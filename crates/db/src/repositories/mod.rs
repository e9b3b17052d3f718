//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod code;
pub mod grant;
pub mod ledger;
pub mod report;

pub use code::{CodeFilter, CodeRepository, RedeemOutcome};
pub use grant::GrantRepository;
pub use ledger::LedgerRepository;
pub use report::ReportRepository;
