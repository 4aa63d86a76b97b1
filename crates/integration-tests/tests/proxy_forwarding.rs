//! Integration tests for the `/api` forwarder.
//!
//! A mock upstream echoes each request back as JSON so the tests can see
//! exactly what the proxy sent.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use reqwest::{StatusCode, header};
use serde_json::{Value, json};
use url::Url;
use wardrobe_integration_tests::{echo_upstream, spawn, spawn_proxy, unreachable_url};
use wardrobe_proxy::CorsPolicy;

const ORIGIN: &str = "http://localhost:8081";

async fn proxy_to_echo() -> (Url, Url) {
    let upstream = wardrobe_integration_tests::base_url(spawn(echo_upstream()).await);
    let proxy = spawn_proxy(
        upstream.clone(),
        Duration::from_secs(30),
        CorsPolicy::Permissive,
    )
    .await;
    (proxy, upstream)
}

fn url(base: &Url, path: &str) -> Url {
    base.join(path).unwrap()
}

// =============================================================================
// Path and Query
// =============================================================================

#[tokio::test]
async fn test_strips_api_prefix() {
    let (proxy, _) = proxy_to_echo().await;

    let response = reqwest::get(url(&proxy, "/api/graphql/system")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let echo: Value = response.json().await.unwrap();
    assert_eq!(echo["path"], "/graphql/system");
    assert_eq!(echo["method"], "GET");
}

#[tokio::test]
async fn test_bare_api_maps_to_root() {
    let (proxy, _) = proxy_to_echo().await;

    let echo: Value = reqwest::get(url(&proxy, "/api"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(echo["path"], "/");
}

#[tokio::test]
async fn test_query_string_preserved() {
    let (proxy, _) = proxy_to_echo().await;

    let echo: Value = reqwest::get(url(&proxy, "/api/items/products?limit=10&offset=20&search=wool%20coat"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(echo["path"], "/items/products");
    assert_eq!(echo["query"], "limit=10&offset=20&search=wool%20coat");
}

#[tokio::test]
async fn test_non_api_paths_are_not_forwarded() {
    let (proxy, _) = proxy_to_echo().await;

    let response = reqwest::get(url(&proxy, "/graphql")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "not found", "path": "/graphql" }));
}

// =============================================================================
// Method, Headers, Body
// =============================================================================

#[tokio::test]
async fn test_post_body_and_headers_forwarded() {
    let (proxy, upstream) = proxy_to_echo().await;
    let query = json!({ "query": "{ users_me { id } }" });

    let response = reqwest::Client::new()
        .post(url(&proxy, "/api/graphql/system"))
        .header(header::AUTHORIZATION, "Bearer dev-token")
        .header(header::ORIGIN, ORIGIN)
        .json(&query)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let echo: Value = response.json().await.unwrap();
    assert_eq!(echo["method"], "POST");
    assert_eq!(echo["headers"]["authorization"], "Bearer dev-token");
    assert_eq!(echo["headers"]["content-type"], "application/json");
    assert_eq!(echo["headers"]["origin"], ORIGIN);

    // Host is rewritten to the upstream
    let expected_host = format!(
        "{}:{}",
        upstream.host_str().unwrap(),
        upstream.port().unwrap()
    );
    assert_eq!(echo["headers"]["host"], expected_host);

    let forwarded: Value = serde_json::from_str(echo["body"].as_str().unwrap()).unwrap();
    assert_eq!(forwarded, query);
}

#[tokio::test]
async fn test_other_methods_forwarded() {
    let (proxy, _) = proxy_to_echo().await;
    let client = reqwest::Client::new();

    for method in [reqwest::Method::PUT, reqwest::Method::DELETE, reqwest::Method::PATCH] {
        let echo: Value = client
            .request(method.clone(), url(&proxy, "/api/items/products/1"))
            .body("{}")
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(echo["method"], method.as_str());
        assert_eq!(echo["body"], "{}");
    }
}

#[tokio::test]
async fn test_request_id_forwarded_and_echoed() {
    let (proxy, _) = proxy_to_echo().await;

    let response = reqwest::Client::new()
        .get(url(&proxy, "/api/ping"))
        .header("x-request-id", "trace-abc")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-abc");

    let echo: Value = response.json().await.unwrap();
    assert_eq!(echo["headers"]["x-request-id"], "trace-abc");
}

// =============================================================================
// Upstream Responses
// =============================================================================

#[tokio::test]
async fn test_upstream_status_and_headers_relayed() {
    let (proxy, _) = proxy_to_echo().await;

    let response = reqwest::Client::new()
        .get(url(&proxy, "/api/teapot"))
        .header(header::ORIGIN, ORIGIN)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(response.headers()["x-brewed"], "earl-grey");
    assert_eq!(response.headers()["x-upstream"], "mock");
    // The upstream's CORS header is replaced by the proxy's own
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, Authorization, Accept"
    );
}

#[tokio::test]
async fn test_redirects_are_relayed_not_followed() {
    let (proxy, _) = proxy_to_echo().await;
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let response = client.get(url(&proxy, "/api/redirect")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/elsewhere");
}

#[tokio::test]
async fn test_allow_list_origin_on_forwarded_response() {
    let upstream = wardrobe_integration_tests::base_url(spawn(echo_upstream()).await);
    let proxy = spawn_proxy(
        upstream,
        Duration::from_secs(30),
        CorsPolicy::AllowList(vec![ORIGIN.parse().unwrap()]),
    )
    .await;

    let response = reqwest::Client::new()
        .get(url(&proxy, "/api/graphql"))
        .header(header::ORIGIN, ORIGIN)
        .send()
        .await
        .unwrap();

    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], ORIGIN);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_unreachable_upstream_is_500() {
    let proxy = spawn_proxy(
        unreachable_url().await,
        Duration::from_secs(30),
        CorsPolicy::Permissive,
    )
    .await;

    let response = reqwest::Client::new()
        .get(url(&proxy, "/api/graphql"))
        .header(header::ORIGIN, ORIGIN)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "proxy error");
    assert!(!body["details"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_slow_upstream_is_408() {
    let upstream = wardrobe_integration_tests::base_url(spawn(echo_upstream()).await);
    let proxy = spawn_proxy(upstream, Duration::from_secs(1), CorsPolicy::Permissive).await;

    let response = reqwest::Client::new()
        .get(url(&proxy, "/api/slow"))
        .header(header::ORIGIN, ORIGIN)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "request timed out" }));
}

// =============================================================================
// Local Endpoints
// =============================================================================

#[tokio::test]
async fn test_health_reports_upstream() {
    let (proxy, upstream) = proxy_to_echo().await;

    let response = reqwest::get(url(&proxy, "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "wardrobe proxy is running");
    assert_eq!(body["upstream"], upstream.as_str());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_options_answered_locally() {
    let (proxy, _) = proxy_to_echo().await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, url(&proxy, "/api/graphql"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-upstream").is_none());
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
