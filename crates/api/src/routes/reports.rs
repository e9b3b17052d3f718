//! Admin report routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::{AppState, middleware::AuthUser};
use tabeeb_core::report::LicenseReportFilter;
use tabeeb_db::repositories::ReportRepository;
use tabeeb_db::repositories::report::ReportError;
use tabeeb_shared::types::PageRequest;

/// Largest accepted page size for reports.
const MAX_PER_PAGE: u32 = 100;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/reports/licenses", get(license_report))
        .route("/admin/reports/reconciliation", get(reconciliation))
}

// ============================================================================
// Request Types
// ============================================================================

/// Query parameters for the license report.
#[derive(Debug, Deserialize)]
pub struct LicenseReportQuery {
    /// Filter by batch prefix.
    pub prefix: Option<String>,
    /// Redeemed at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Redeemed before this instant.
    pub to: Option<DateTime<Utc>>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default 20, max 100).
    pub per_page: Option<u32>,
}

/// Query parameters for the reconciliation report.
#[derive(Debug, Deserialize)]
pub struct ReconciliationQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default 20, max 100).
    pub per_page: Option<u32>,
}

fn page_request(page: Option<u32>, per_page: Option<u32>) -> PageRequest {
    PageRequest {
        page: page.unwrap_or(1),
        per_page: per_page.unwrap_or(20),
    }
    .clamped(MAX_PER_PAGE)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/admin/reports/licenses` - Redeemed codes with resulting access.
async fn license_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LicenseReportQuery>,
) -> impl IntoResponse {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let filter = LicenseReportFilter {
        prefix: query.prefix,
        redeemed_from: query.from,
        redeemed_to: query.to,
    };
    let page = page_request(query.page, query.per_page);

    let repo = ReportRepository::new((*state.db).clone());

    match repo.license_report(&filter, page).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => report_error_response(&e),
    }
}

/// GET `/admin/reports/reconciliation` - Redeemed codes missing their credit.
async fn reconciliation(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ReconciliationQuery>,
) -> impl IntoResponse {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let page = page_request(query.page, query.per_page);
    let repo = ReportRepository::new((*state.db).clone());

    match repo.reconciliation(page).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => report_error_response(&e),
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps report errors to JSON responses.
fn report_error_response(err: &ReportError) -> Response {
    match err {
        ReportError::InvalidDateRange { .. } => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_date_range",
                "message": err.to_string()
            })),
        )
            .into_response(),
        ReportError::Database(_) => {
            error!(error = %err, "report query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}
