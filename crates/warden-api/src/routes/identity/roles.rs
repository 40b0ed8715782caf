//! Role routes

use axum::{Router, extract::State, http::StatusCode, routing::post};
use warden_core::CreateRoleRequest;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// POST /api/v1/role/add
async fn create_role(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateRoleRequest>,
) -> Result<StatusCode, ApiError> {
    state.identity.create_role(request).await?;
    Ok(StatusCode::CREATED)
}

/// Create role routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/role/add", post(create_role))
}
