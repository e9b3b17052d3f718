//! Consumption gate routes: access checks, purchases, video metering.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use tabeeb_core::access::{AccessError, PricingPolicy, ResourceKind};
use tabeeb_db::entities::grants;
use tabeeb_db::repositories::GrantRepository;

/// Creates the access routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/access/{resource_kind}/{resource_id}", get(check_access))
        .route("/access/purchase", post(purchase))
        .route("/access/video/consume", post(consume_video))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for purchasing a one-shot resource.
#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    /// The resource to unlock.
    pub resource_id: Uuid,
    /// `article` or `course`.
    pub resource_kind: String,
}

/// Request body for metered video consumption.
#[derive(Debug, Deserialize)]
pub struct ConsumeVideoRequest {
    /// The course being watched.
    pub course_id: Uuid,
    /// Minutes to debit.
    pub minutes: i64,
}

/// Response for a grant.
#[derive(Debug, Serialize)]
pub struct GrantResponse {
    /// Grant ID.
    pub id: Uuid,
    /// The unlocked resource.
    pub resource_id: Uuid,
    /// Article or course.
    pub resource_kind: String,
    /// Amount paid.
    pub price: i64,
    /// When the unlock happened.
    pub created_at: String,
}

impl From<grants::Model> for GrantResponse {
    fn from(model: grants::Model) -> Self {
        let kind: ResourceKind = model.resource_kind.into();
        Self {
            id: model.id,
            resource_id: model.resource_id,
            resource_kind: kind.as_str().to_string(),
            price: model.price,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

fn invalid_kind_response() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid_resource_kind",
            "message": "Resource kind must be article or course"
        })),
    )
        .into_response()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/access/{resource_kind}/{resource_id}` - Is this resource unlocked?
async fn check_access(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((resource_kind, resource_id)): Path<(String, Uuid)>,
) -> impl IntoResponse {
    let Ok(kind) = ResourceKind::from_str(&resource_kind) else {
        return invalid_kind_response();
    };

    let repo = GrantRepository::new((*state.db).clone());
    let policy = PricingPolicy::from_config(&state.codes_config);

    match repo
        .check_access(auth.user_id(), resource_id, kind, &policy)
        .await
    {
        Ok(decision) => (StatusCode::OK, Json(decision)).into_response(),
        Err(e) => access_error_response(&e),
    }
}

/// POST `/access/purchase` - Unlock a one-shot resource, charging once.
async fn purchase(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<PurchaseRequest>,
) -> impl IntoResponse {
    let Ok(kind) = ResourceKind::from_str(&payload.resource_kind) else {
        return invalid_kind_response();
    };

    let repo = GrantRepository::new((*state.db).clone());
    let policy = PricingPolicy::from_config(&state.codes_config);

    match repo
        .purchase(auth.user_id(), payload.resource_id, kind, &policy)
        .await
    {
        Ok(grant) => (
            StatusCode::OK,
            Json(json!({ "grant": GrantResponse::from(grant) })),
        )
            .into_response(),
        Err(e) => access_error_response(&e),
    }
}

/// POST `/access/video/consume` - Debit watched minutes.
async fn consume_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ConsumeVideoRequest>,
) -> impl IntoResponse {
    let repo = GrantRepository::new((*state.db).clone());

    match repo
        .consume_video_minutes(auth.user_id(), payload.course_id, payload.minutes)
        .await
    {
        Ok(balance) => (StatusCode::OK, Json(json!({ "balance": balance }))).into_response(),
        Err(e) => access_error_response(&e),
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Maps consumption gate errors to JSON responses.
fn access_error_response(err: &AccessError) -> Response {
    if err.http_status_code() >= 500 {
        error!(error = %err, "access operation failed");
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
