//! Row and filter types for admin reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tabeeb_shared::types::CreditPayload;

use crate::access::ResourceKind;

/// Filters for the license report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LicenseReportFilter {
    /// Restrict to codes under this batch prefix.
    pub prefix: Option<String>,
    /// Redeemed at or after this instant.
    pub redeemed_from: Option<DateTime<Utc>>,
    /// Redeemed before this instant.
    pub redeemed_to: Option<DateTime<Utc>>,
}

/// A resource unlock held by the redeeming user.
#[derive(Debug, Clone, Serialize)]
pub struct GrantSummary {
    /// Grant ID.
    pub id: Uuid,
    /// The unlocked resource.
    pub resource_id: Uuid,
    /// Article or course.
    pub resource_kind: ResourceKind,
    /// When the unlock happened.
    pub created_at: DateTime<Utc>,
}

/// Quiz outcome for a course, from the external course/quiz subsystem.
#[derive(Debug, Clone, Serialize)]
pub struct QuizOutcome {
    /// The course the quiz belongs to.
    pub course_id: Uuid,
    /// Best score across attempts.
    pub best_score: i32,
    /// Whether any attempt passed.
    pub passed: bool,
    /// Number of attempts.
    pub attempts: u64,
}

/// One row of the license report: a redeemed code with the resulting access.
///
/// `degraded` is set when an external lookup (quiz attempts) failed for this
/// row; the rest of the row is still served rather than failing the page.
#[derive(Debug, Clone, Serialize)]
pub struct LicenseReportRow {
    /// Code ID.
    pub code_id: Uuid,
    /// The token, for admin eyes only.
    pub code: String,
    /// Batch prefix.
    pub prefix: String,
    /// Credit payload the code carried.
    pub payload: CreditPayload,
    /// The redeeming user.
    pub redeemed_by: Uuid,
    /// When the code was redeemed.
    pub redeemed_at: DateTime<Utc>,
    /// Resource unlocks the user holds.
    pub grants: Vec<GrantSummary>,
    /// Quiz outcomes for unlocked courses, where available.
    pub quiz_outcomes: Vec<QuizOutcome>,
    /// True if an external lookup failed and this row is partial.
    pub degraded: bool,
}

/// One row of the reconciliation report: a redeemed code whose redeem
/// transaction is missing (a request was cut short between the status flip
/// and the ledger credit).
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationRow {
    /// Code ID.
    pub code_id: Uuid,
    /// The token.
    pub code: String,
    /// Who the code is marked redeemed by.
    pub redeemed_by: Option<Uuid>,
    /// When the flip was recorded.
    pub redeemed_at: Option<DateTime<Utc>>,
    /// The payload that should have been credited.
    pub payload: CreditPayload,
}
