//! User routes

use axum::{Json, Router, extract::State, routing::get};

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireAuth;
use super::types::UserResponse;

/// GET /api/v1/users/me (Authenticated)
async fn current_user(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.identity.get_user(auth.id).await?;
    Ok(Json(user.into()))
}

/// Create user routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/users/me", get(current_user))
}
