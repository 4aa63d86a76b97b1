//! Integration tests for the Wardrobe proxy and storefront client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p wardrobe-integration-tests
//! ```
//!
//! Every test starts its own servers on ephemeral `127.0.0.1` ports, so no
//! network access or running backend is needed.
//!
//! # Test Categories
//!
//! - `proxy_forwarding` - the `/api` relay against a mock upstream
//! - `storefront_client` - the GraphQL client against a mock Directus, directly
//!   and through the proxy

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;
use url::Url;
use wardrobe_proxy::{AppState, CorsPolicy, ProxyConfig};

/// How long the mock upstream stalls on `/slow`.
pub const SLOW_RESPONSE: Duration = Duration::from_secs(3);

/// Serve `app` on an ephemeral port and return its address.
pub async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Base URL for a spawned server.
#[must_use]
pub fn base_url(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{addr}")).expect("valid socket URL")
}

/// A local URL nothing is listening on.
pub async fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    base_url(addr)
}

/// Start the proxy in front of `target`.
pub async fn spawn_proxy(target: Url, upstream_timeout: Duration, cors: CorsPolicy) -> Url {
    let config = ProxyConfig {
        target,
        upstream_timeout,
        cors,
        ..ProxyConfig::from_lookup(|_| None).expect("default proxy config")
    };
    let state = AppState::new(config).expect("proxy state");
    base_url(spawn(wardrobe_proxy::app(state)).await)
}

/// Mock upstream that describes every request it receives as JSON.
///
/// Special paths:
///
/// - `/slow` waits [`SLOW_RESPONSE`] before answering
/// - `/teapot` answers 418 with a custom header
/// - `/redirect` answers 302 pointing at `/elsewhere`
///
/// Every response also carries the upstream's own CORS header so tests can
/// check the proxy replaces it.
#[must_use]
pub fn echo_upstream() -> Router {
    Router::new().fallback(echo)
}

async fn echo(request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body: Bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    let mut headers = HeaderMap::new();
    headers.insert(
        "access-control-allow-origin",
        HeaderValue::from_static("https://upstream.example"),
    );
    headers.insert("x-upstream", HeaderValue::from_static("mock"));

    let status = match parts.uri.path() {
        "/slow" => {
            tokio::time::sleep(SLOW_RESPONSE).await;
            StatusCode::OK
        }
        "/teapot" => {
            headers.insert("x-brewed", HeaderValue::from_static("earl-grey"));
            StatusCode::IM_A_TEAPOT
        }
        "/redirect" => {
            headers.insert("location", HeaderValue::from_static("/elsewhere"));
            StatusCode::FOUND
        }
        _ => StatusCode::OK,
    };

    let echoed_headers: Map<String, Value> = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                Value::String(value.to_str().unwrap_or_default().to_string()),
            )
        })
        .collect();

    let description = json!({
        "method": parts.method.as_str(),
        "path": parts.uri.path(),
        "query": parts.uri.query(),
        "headers": echoed_headers,
        "body": String::from_utf8_lossy(&body),
    });

    (status, headers, Json(description)).into_response()
}
