//! Core error types
//!
//! These are the caller-facing kinds. Store errors are translated into them
//! at the flow boundary; login failures collapse into `InvalidCredentials`
//! whatever their cause.

use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid payload: {0}")]
    Validation(ValidationErrors),

    /// Carries the field that is already claimed (`username` or `email`)
    #[error("{0} already exists")]
    DuplicateIdentity(String),

    #[error("Role '{0}' already exists")]
    DuplicateRole(String),

    #[error("Username or password invalid")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Persistence(#[from] warden_db::DbError),
}
