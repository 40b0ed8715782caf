//! Warden Authentication
//!
//! This crate provides the credential primitives Warden is built on:
//! Argon2id password hashing and HS256 JWT issuance and validation.

pub mod bearer;
pub mod error;
pub mod jwt;
pub mod password;

pub use bearer::{AuthUser, extract_bearer_token};
pub use error::AuthError;
pub use jwt::{Claims, JwtManager};
pub use password::CredentialHasher;
