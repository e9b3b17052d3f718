//! Balance and transaction semantics.
//!
//! The ledger is the single source of truth for credit balances. This module
//! holds the pure half: delta validation, balance projection, and the
//! reconstruction rule (a balance equals the sum of its transaction deltas).
//! The atomic persistence half lives in the db crate.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;
#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{DeltaRequest, TransactionReason, TransactionRecord};
