use crate::client::IdentityClient;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::*;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

pub const PHONE_REQUIRED: &str = "Phone number is required";

/// Shared application state injected into handlers. Read-only after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Live or mock identity client, chosen once from the configured credentials.
    pub client: IdentityClient,
}

/// Liveness probe.
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Metrics probe required by the hosting runtime. Carries no metrics.
pub async fn metrics() -> StatusCode {
    StatusCode::OK
}

/// GET /api/test
///
/// Static smoke-test payload confirming API routing works.
pub async fn smoke_test() -> Json<serde_json::Value> {
    tracing::info!("Test endpoint hit");
    Json(json!({
        "success": true,
        "message": "Backend is working!"
    }))
}

/// POST /api/identity/phone-match
///
/// Runs identity insights for a phone number plus optional subscriber and
/// location attributes. Returns mock data when no credentials are configured.
///
/// # Returns
///
/// * `Result<Json<ApiResponse<PhoneMatchData>>, AppError>` - Normalized insights, mock data, or
///   the upstream failure.
pub async fn phone_match(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VerificationRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PhoneMatchData>>, AppError> {
    let Json(req) = payload.map_err(reject_body)?;
    tracing::info!("POST /api/identity/phone-match - live: {}", state.client.is_live());
    tracing::debug!("Phone match request: {:?}", req);

    let phone_number = require_phone(req.phone_number.as_deref())?;
    let response = state.client.phone_match(phone_number, &req).await?;

    Ok(Json(response))
}

/// POST /api/identity/number-verify
///
/// Legacy number insight lookup (carrier, line type, reachability).
pub async fn number_verify(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NumberVerifyRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<NumberVerifyData>>, AppError> {
    let Json(req) = payload.map_err(reject_body)?;
    tracing::info!("POST /api/identity/number-verify - live: {}", state.client.is_live());

    let phone_number = require_phone(req.phone_number.as_deref())?;
    let response = state.client.number_verify(phone_number).await?;

    Ok(Json(response))
}

fn require_phone(phone_number: Option<&str>) -> Result<&str, AppError> {
    phone_number.ok_or_else(|| AppError::BadRequest(PHONE_REQUIRED.to_string()))
}

/// Any unreadable body is a client error; only an oversized one keeps its own status.
fn reject_body(rejection: JsonRejection) -> AppError {
    tracing::warn!("Rejected request body: {}", rejection.body_text());
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(rejection.body_text());
    }
    AppError::BadRequest(rejection.body_text())
}
