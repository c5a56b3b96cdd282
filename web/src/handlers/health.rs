//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems to
//! verify service health.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Simple liveness check.
///
/// Returns 200 OK to indicate the process is running; does NOT check
/// dependencies.
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Readiness check.
///
/// Verifies the database pool can execute a query. Returns 503 while the
/// database is unreachable so orchestrators hold traffic back.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "database unavailable")
        }
    }
}
