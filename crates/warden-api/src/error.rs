//! API error types

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use warden_core::CoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Auth error: {0}")]
    Auth(#[from] warden_auth::AuthError),
}

const INTERNAL_MESSAGE: &str = "Internal server error";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut fields = None;

        let (status, code, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Unauthorized | ApiError::Auth(_) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Unauthorized".to_string(),
            ),
            ApiError::Body(rejection) => match rejection {
                // Well-formed JSON that does not fit the payload type
                JsonRejection::JsonDataError(e) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    e.body_text(),
                ),
                JsonRejection::MissingJsonContentType(e) => (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "UNSUPPORTED_MEDIA_TYPE",
                    e.body_text(),
                ),
                other => (StatusCode::BAD_REQUEST, "BAD_REQUEST", other.body_text()),
            },
            ApiError::Core(e) => match e {
                CoreError::Validation(errors) => {
                    fields = Some(errors.clone());
                    (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        "Invalid payload".to_string(),
                    )
                }
                CoreError::DuplicateIdentity(_) | CoreError::DuplicateRole(_) => {
                    (StatusCode::CONFLICT, "DUPLICATE", e.to_string())
                }
                CoreError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    e.to_string(),
                ),
                CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
                CoreError::Hashing(_)
                | CoreError::Signing(_)
                | CoreError::Config(_)
                | CoreError::Persistence(_) => {
                    // Detail stays in the logs
                    error!("Request failed: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },
        };

        let mut body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });
        if let Some(fields) = fields {
            body["error"]["fields"] = json!(fields);
        }

        (status, axum::Json(body)).into_response()
    }
}
