//! Health check endpoint.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

/// Body returned by `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
    /// Upstream base URL requests are forwarded to.
    pub upstream: String,
}

/// Liveness health check.
///
/// Does not contact the upstream.
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        message: "wardrobe proxy is running",
        timestamp: Utc::now(),
        upstream: state.target().to_string(),
    })
}
