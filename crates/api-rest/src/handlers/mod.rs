//! REST request handlers.

pub mod catalog;
pub mod journey;
pub mod search;
pub mod support;

use crate::error::ApiError;
use crate::state::AppState;
use api_shared::{validate_api_key, HealthRes, HealthService};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Json;

/// Checks the `x-api-key` header for admin-only catalog mutations.
pub(crate) fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let provided = headers.get("x-api-key").and_then(|value| value.to_str().ok());
    validate_api_key(provided, &state.admin_api_key)?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint used for monitoring and load balancer checks.
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}
