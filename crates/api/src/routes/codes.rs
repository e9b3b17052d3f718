//! Redemption code routes: user redemption and admin batch management.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use tabeeb_core::codes::{BatchRequest, CodeError};
use tabeeb_db::entities::{redemption_codes, sea_orm_active_enums::CodeStatus};
use tabeeb_db::repositories::{CodeFilter, CodeRepository};
use tabeeb_shared::types::{CreditPayload, PageRequest, PageResponse};

/// Largest accepted page size for code listings.
const MAX_PER_PAGE: u32 = 100;

/// Creates the code routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/codes/redeem", post(redeem))
        .route("/admin/codes/batch", post(generate_batch))
        .route("/admin/codes", get(list_codes))
        .route("/admin/codes/{code_id}/revoke", post(revoke))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for redeeming a code.
#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    /// The token to redeem.
    pub code: String,
}

/// Request body for generating a batch of codes.
#[derive(Debug, Deserialize)]
pub struct GenerateBatchRequest {
    /// Number of codes to generate.
    pub amount: u32,
    /// Batch prefix (uppercase alphanumeric).
    pub prefix: String,
    /// Credit payload carried by every code.
    pub payload: CreditPayload,
    /// Optional expiry applied to every code.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Query parameters for listing codes.
#[derive(Debug, Deserialize)]
pub struct ListCodesQuery {
    /// Filter by prefix.
    pub prefix: Option<String>,
    /// Filter by batch id.
    pub batch_id: Option<Uuid>,
    /// Filter by status.
    pub status: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default 20, max 100).
    pub per_page: Option<u32>,
}

/// Response for a single code.
#[derive(Debug, Serialize)]
pub struct CodeResponse {
    /// Code ID.
    pub id: Uuid,
    /// The token.
    pub code: String,
    /// Batch prefix.
    pub prefix: String,
    /// Batch id.
    pub batch_id: Uuid,
    /// Credit payload.
    pub payload: CreditPayload,
    /// Lifecycle status.
    pub status: String,
    /// Expiry, if any.
    pub expires_at: Option<String>,
    /// Redeeming user, if redeemed.
    pub redeemed_by: Option<Uuid>,
    /// Redemption time, if redeemed.
    pub redeemed_at: Option<String>,
    /// Creation time.
    pub created_at: String,
}

impl From<redemption_codes::Model> for CodeResponse {
    fn from(model: redemption_codes::Model) -> Self {
        let payload = model.payload();
        let status: tabeeb_core::codes::CodeStatus = model.status.into();
        Self {
            id: model.id,
            code: model.code,
            prefix: model.prefix,
            batch_id: model.batch_id,
            payload,
            status: status.as_str().to_string(),
            expires_at: model.expires_at.map(|t| t.to_rfc3339()),
            redeemed_by: model.redeemed_by,
            redeemed_at: model.redeemed_at.map(|t| t.to_rfc3339()),
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

fn parse_status(raw: &str) -> Option<CodeStatus> {
    match raw {
        "unused" => Some(CodeStatus::Unused),
        "redeemed" => Some(CodeStatus::Redeemed),
        "expired" => Some(CodeStatus::Expired),
        "revoked" => Some(CodeStatus::Revoked),
        _ => None,
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/codes/redeem` - Exchange a code for its credit payload.
async fn redeem(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RedeemRequest>,
) -> impl IntoResponse {
    if payload.code.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "missing_code",
                "message": "A code is required"
            })),
        )
            .into_response();
    }

    let repo = CodeRepository::new((*state.db).clone());

    match repo.redeem(&payload.code, auth.user_id()).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "balance": outcome.balance,
                "payload": outcome.code.payload(),
            })),
        )
            .into_response(),
        Err(e) => code_error_response(&e),
    }
}

/// POST `/admin/codes/batch` - Generate a batch of codes.
async fn generate_batch(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<GenerateBatchRequest>,
) -> impl IntoResponse {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let repo = CodeRepository::new((*state.db).clone());

    let request = BatchRequest {
        amount: payload.amount,
        prefix: payload.prefix.trim().to_ascii_uppercase(),
        payload: payload.payload,
        expires_at: payload.expires_at,
        created_by: auth.user_id(),
    };

    match repo.generate_batch(&request, &state.codes_config).await {
        Ok(codes) => {
            let batch_id = codes.first().map(|c| c.batch_id);
            let items: Vec<CodeResponse> = codes.into_iter().map(CodeResponse::from).collect();
            (
                StatusCode::CREATED,
                Json(json!({ "batch_id": batch_id, "codes": items })),
            )
                .into_response()
        }
        Err(e) => code_error_response(&e),
    }
}

/// GET `/admin/codes` - List codes with filters.
async fn list_codes(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListCodesQuery>,
) -> impl IntoResponse {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => match parse_status(raw) {
            Some(status) => Some(status),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_status",
                        "message": "Status must be unused, redeemed, expired, or revoked"
                    })),
                )
                    .into_response();
            }
        },
    };

    let filter = CodeFilter {
        prefix: query.prefix,
        batch_id: query.batch_id,
        status,
    };
    let page = PageRequest {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    }
    .clamped(MAX_PER_PAGE);

    let repo = CodeRepository::new((*state.db).clone());

    match repo.list_codes(&filter, page).await {
        Ok(codes) => {
            let response = PageResponse::new(
                codes.data.into_iter().map(CodeResponse::from).collect::<Vec<_>>(),
                codes.meta.page,
                codes.meta.per_page,
                codes.meta.total,
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => code_error_response(&e),
    }
}

/// POST `/admin/codes/{code_id}/revoke` - Withdraw an unused code.
async fn revoke(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(code_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(rejection) = auth.require_admin() {
        return rejection;
    }

    let repo = CodeRepository::new((*state.db).clone());

    match repo.revoke(code_id).await {
        Ok(code) => (
            StatusCode::OK,
            Json(json!({ "code": CodeResponse::from(code) })),
        )
            .into_response(),
        Err(e) => code_error_response(&e),
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps code registry errors to JSON responses.
fn code_error_response(err: &CodeError) -> Response {
    if err.http_status_code() >= 500 {
        error!(error = %err, "code operation failed");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response();
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("unused"), Some(CodeStatus::Unused));
        assert_eq!(parse_status("redeemed"), Some(CodeStatus::Redeemed));
        assert_eq!(parse_status("expired"), Some(CodeStatus::Expired));
        assert_eq!(parse_status("revoked"), Some(CodeStatus::Revoked));
        assert_eq!(parse_status("burned"), None);
    }
}
