//! Warden Core Business Logic
//!
//! This crate provides the identity flows of Warden: registration, login
//! and role creation, composed from the stores in `warden-db` and the
//! credential primitives in `warden-auth`.

pub mod config;
pub mod error;
pub mod request;
pub mod service;
pub mod validation;

pub use config::IdentityConfig;
pub use error::CoreError;
pub use request::{CreateRoleRequest, LoginRequest, RegisterRequest};
pub use service::IdentityService;
pub use validation::{FieldError, ValidationErrors};
