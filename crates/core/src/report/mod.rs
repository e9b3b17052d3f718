//! Admin reporting types.
//!
//! Read-only projections over the code registry, ledger, and grants. Row
//! assembly and the joins live in the db crate; this module defines the row
//! shapes and the partial-failure (degraded row) semantics.

pub mod types;

pub use types::{
    GrantSummary, LicenseReportFilter, LicenseReportRow, QuizOutcome, ReconciliationRow,
};
