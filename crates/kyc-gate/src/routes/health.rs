//! Health probes and gate counters.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::AppError;
use crate::metrics::GateMetricsSnapshot;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health/liveness", get(liveness))
        .route("/api/health/readiness", get(readiness))
        .route("/api/metrics", get(metrics))
}

/// Liveness probe. Always 200 while the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe. 503 until an identity backend is configured, since
/// every protected request would otherwise be bounced to sign-in.
async fn readiness(State(state): State<AppState>) -> Result<&'static str, AppError> {
    if state.identity.is_some() {
        Ok("ready")
    } else {
        Err(AppError::ServiceUnavailable(
            "identity backend not configured".into(),
        ))
    }
}

async fn metrics(State(state): State<AppState>) -> Json<GateMetricsSnapshot> {
    Json(state.metrics.snapshot())
}
