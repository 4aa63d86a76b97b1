//! The `/api` forwarder.

use axum::{
    body::Body,
    extract::{Request, State},
    response::Response,
};
use tracing::instrument;

use crate::error::{ProxyError, Result};
use crate::forward::{
    filter_request_headers, filter_response_headers, has_body, strip_api_prefix, upstream_url,
};
use crate::state::AppState;

/// Relay a request to the upstream and stream the answer back.
///
/// The `/api` prefix is stripped, the query string kept, and bodies are
/// streamed in both directions without buffering.
///
/// # Errors
///
/// Returns `ProxyError::Timeout` if the upstream stays idle past the
/// configured timeout, and `ProxyError::Upstream` for any other transport
/// failure before the response headers arrive.
#[instrument(skip_all, fields(method = %request.method(), uri = %request.uri()))]
pub async fn forward(State(state): State<AppState>, request: Request) -> Result<Response> {
    let (parts, body) = request.into_parts();

    let path = parts.uri.path();
    let rest = strip_api_prefix(path).ok_or_else(|| ProxyError::NotFound(path.to_string()))?;
    let target = upstream_url(state.target(), rest, parts.uri.query());

    tracing::info!(upstream = %target, "Proxying request");

    let mut upstream = state
        .client()
        .request(parts.method.clone(), target)
        .headers(filter_request_headers(&parts.headers));

    if has_body(&parts.headers) {
        upstream = upstream.body(reqwest::Body::wrap_stream(body.into_data_stream()));
    }

    let response = upstream.send().await.map_err(|e| {
        tracing::warn!(error = %e, "Upstream request failed");
        ProxyError::from(e)
    })?;

    let status = response.status();
    tracing::info!(status = %status, "Upstream responded");

    let mut builder = Response::builder().status(status);
    if let Some(headers) = builder.headers_mut() {
        *headers = filter_response_headers(response.headers());
    }

    builder
        .body(Body::from_stream(response.bytes_stream()))
        .map_err(|e| ProxyError::Internal(e.to_string()))
}
