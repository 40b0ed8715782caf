//! Health check endpoints

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

/// Health status response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// `ok`, `no_roles` (registration cannot succeed yet) or `unavailable`
    pub store: &'static str,
}

/// Health check handler
///
/// Reaches the role store, so a dead database shows up as 503 rather than
/// a healthy process.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    metrics::counter!("warden_health_checks_total").increment(1);

    let (code, status, store) = match state.identity.check_store().await {
        Ok(true) => (StatusCode::OK, "healthy", "ok"),
        Ok(false) => (StatusCode::OK, "degraded", "no_roles"),
        Err(e) => {
            warn!("Health check could not reach the store: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "unavailable")
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            store,
        }),
    )
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
}
