use std::sync::Arc;

use axum::extract::State;

use crate::AppState;

/// GET /notification/health/check
pub async fn health_check() -> &'static str {
    "NOTIFICATION SERVICE IS HEALTH"
}

/// GET /notification/metrics
/// Prometheus metrics, empty when no recorder is installed.
pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}
