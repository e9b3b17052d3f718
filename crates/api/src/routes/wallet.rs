//! Wallet routes: balance, history, and admin adjustments.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use tabeeb_core::ledger::{DeltaRequest, LedgerError, TransactionReason};
use tabeeb_db::repositories::LedgerRepository;
use tabeeb_shared::types::{CreditKind, PageRequest};

/// Largest accepted page size for history queries.
const MAX_PER_PAGE: u32 = 100;

/// Creates the wallet routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallet/balance", get(get_balance))
        .route("/wallet/history", get(get_history))
        .route("/admin/wallet/adjust", post(admin_adjust))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default 20, max 100).
    pub per_page: Option<u32>,
    /// Restrict to one credit kind.
    pub kind: Option<String>,
}

/// Request body for an admin balance adjustment.
#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    /// The user whose balance to adjust.
    pub user_id: Uuid,
    /// Credit kind to adjust.
    pub kind: String,
    /// Signed delta to apply.
    pub delta: i64,
    /// Reason recorded on the compensating transaction.
    pub note: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/wallet/balance` - The caller's current balance.
async fn get_balance(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = LedgerRepository::new((*state.db).clone());

    match repo.get_balance(auth.user_id()).await {
        Ok(balance) => (StatusCode::OK, Json(json!({ "balance": balance }))).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// GET `/wallet/history` - Reverse-chronological transaction history.
async fn get_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let kind = match query.kind.as_deref() {
        None => None,
        Some(raw) => match CreditKind::from_str(raw) {
            Ok(kind) => Some(kind),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_kind",
                        "message": "Kind must be universal, video_minutes, or article_credits"
                    })),
                )
                    .into_response();
            }
        },
    };

    let page = PageRequest {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }
    .clamped(MAX_PER_PAGE);

    let repo = LedgerRepository::new((*state.db).clone());

    match repo.get_history(auth.user_id(), page, kind).await {
        Ok(history) => (StatusCode::OK, Json(history)).into_response(),
        Err(e) => internal_error(&e),
    }
}

/// POST `/admin/wallet/adjust` - Apply a manual correction to a balance.
async fn admin_adjust(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AdjustRequest>,
) -> impl IntoResponse {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let Ok(kind) = CreditKind::from_str(&payload.kind) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_kind",
                "message": "Kind must be universal, video_minutes, or article_credits"
            })),
        )
            .into_response();
    };

    let repo = LedgerRepository::new((*state.db).clone());

    let result = repo
        .apply_delta(DeltaRequest {
            user_id: payload.user_id,
            kind,
            delta: payload.delta,
            reason: TransactionReason::AdminAdjustment,
            reference: None,
            note: payload.note,
        })
        .await;

    match result {
        Ok(balance) => (StatusCode::OK, Json(json!({ "balance": balance }))).into_response(),
        Err(e) => ledger_error_response(&e),
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps ledger errors to JSON responses, hiding internals behind a 500.
fn ledger_error_response(err: &LedgerError) -> Response {
    if err.http_status_code() >= 500 {
        return internal_error(err);
    }

    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    (
        status,
        Json(json!({
            "error": err.error_code().to_ascii_lowercase(),
            "message": err.to_string()
        })),
    )
        .into_response()
}

fn internal_error(err: &dyn std::fmt::Display) -> Response {
    error!(error = %err, "wallet operation failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
