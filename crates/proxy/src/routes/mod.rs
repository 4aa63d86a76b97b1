//! HTTP route handlers for the proxy.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health          - Health check (JSON)
//! ANY  /api             - Forwarded to <target>/
//! ANY  /api/{*path}     - Forwarded to <target>/{path}
//! OPTIONS (any path)    - Answered by the CORS layer, never forwarded
//! *                     - 404 JSON
//! ```

pub mod forward;
pub mod health;

use axum::{
    Router,
    http::Uri,
    routing::{any, get},
};

use crate::error::ProxyError;
use crate::state::AppState;

/// Build the proxy router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/api", any(forward::forward))
        .route("/api/{*path}", any(forward::forward))
        .fallback(not_found)
}

/// Fallback for paths the proxy does not serve.
async fn not_found(uri: Uri) -> ProxyError {
    ProxyError::NotFound(uri.path().to_string())
}
