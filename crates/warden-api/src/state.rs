//! Application state

use std::sync::Arc;
use warden_auth::JwtManager;
use warden_core::IdentityService;

/// Prometheus recorder handle rendered by the `/metrics` route
pub type MetricsHandle = metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityService>,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(identity: Arc<IdentityService>) -> Self {
        let jwt = identity.jwt();
        Self { identity, jwt }
    }
}
