//! Identity API routes
//!
//! Registration, login, role creation and the authenticated user lookup.

pub mod auth;
pub mod roles;
pub mod types;
pub mod users;

use axum::Router;

use crate::state::AppState;

pub use auth::RequireAuth;

/// Create identity API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(roles::routes())
        .merge(users::routes())
}
