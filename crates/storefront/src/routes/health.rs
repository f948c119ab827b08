//! Health check endpoints.

use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

/// Liveness: the process is up and serving.
pub async fn liveness() -> &'static str {
    "OK"
}

/// Readiness: the auth service answers, so sign-in and order submission
/// can work.
pub async fn readiness(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    match state.auth().health().await {
        Ok(()) => Ok("READY"),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
