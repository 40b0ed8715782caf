//! Warden REST API
//!
//! This crate provides the Axum-based HTTP surface for Warden:
//! registration, login, role creation and token-authenticated lookups.

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use extract::ApiJson;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
