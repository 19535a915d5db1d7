use axum::extract::State;
use axum::{routing::any, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process can answer.
    pub status: &'static str,
    /// Current time, ISO-8601 UTC with millisecond precision.
    pub timestamp: String,
    /// Seconds since startup, fractional.
    pub uptime_seconds: f64,
}

/// GET /health -- liveness probe.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime_seconds: state.uptime_secs_f64(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", any(health_check))
}
