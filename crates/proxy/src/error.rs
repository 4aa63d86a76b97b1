//! Proxy error type and its JSON rendering.
//!
//! Upstream failures are not retried. They are mapped to a JSON body that
//! carries the underlying error message so the developer sees why a request
//! failed straight from the browser's network tab.

use std::error::Error as _;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors produced while handling a proxied request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The upstream could not be reached or failed mid-request.
    #[error("Upstream error: {}", error_chain(.0))]
    Upstream(reqwest::Error),

    /// The upstream did not answer within the idle timeout.
    #[error("Upstream request timed out")]
    Timeout,

    /// No route matches the request path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Building the response failed.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Upstream(err)
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match &self {
            Self::Upstream(_) | Self::Internal(_) => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Proxy error"
                );
            }
            Self::Timeout => tracing::warn!("Upstream request timed out"),
            Self::NotFound(_) => {}
        }

        let (status, body) = match &self {
            Self::Upstream(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "proxy error", "details": error_chain(err) }),
            ),
            Self::Internal(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "proxy error", "details": details }),
            ),
            Self::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                json!({ "error": "request timed out" }),
            ),
            Self::NotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({ "error": "not found", "path": path }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Render an error and all of its sources as `outer: inner: root`.
///
/// `reqwest` keeps the useful part (DNS failure, connection refused) in the
/// source chain rather than in its own message.
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Result type alias for `ProxyError`.
pub type Result<T> = std::result::Result<T, ProxyError>;
