//! Authentication extractors and routes

use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    routing::post,
};
use tracing::debug;
use warden_auth::{AuthUser, extract_bearer_token};
use warden_core::{CoreError, LoginRequest, RegisterRequest};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

use super::types::LoginResponse;

// ==================== Auth Extractors ====================

/// Extractor for an authenticated user (required)
pub struct RequireAuth(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = extract_bearer_token(auth_header)?;
        let claims = app_state.jwt.validate_token(token)?;
        let user = AuthUser::from_claims(&claims)?;

        debug!("Authenticated user id {} (role {})", user.id, user.role_id);
        Ok(RequireAuth(user))
    }
}

// ==================== Auth Routes ====================

/// POST /api/v1/register
async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<StatusCode, ApiError> {
    let result = state.identity.register(request).await;

    let outcome = match &result {
        Ok(_) => "created",
        Err(CoreError::Validation(_)) => "invalid",
        Err(CoreError::DuplicateIdentity(_)) => "duplicate",
        Err(_) => "error",
    };
    metrics::counter!("warden_registrations_total", "result" => outcome).increment(1);

    result?;
    Ok(StatusCode::CREATED)
}

/// POST /api/v1/login
async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let result = state.identity.login(request).await;

    let outcome = match &result {
        Ok(_) => "success",
        Err(CoreError::InvalidCredentials) => "invalid_credentials",
        Err(CoreError::Validation(_)) => "invalid",
        Err(_) => "error",
    };
    metrics::counter!("warden_logins_total", "result" => outcome).increment(1);

    Ok(Json(LoginResponse {
        token: result?,
        expires_in: state.jwt.token_ttl().num_seconds(),
    }))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/register", post(register))
        .route("/api/v1/login", post(login))
}
