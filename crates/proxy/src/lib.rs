//! Wardrobe development proxy library.
//!
//! A local relay that lets the Expo web build talk to the Directus backend
//! without tripping over browser CORS checks. Requests to `/api/*` are sent
//! to a single upstream with the `/api` prefix removed; every response gets
//! CORS headers attached.
//!
//! The router is exposed here so it can be served by the binary and driven
//! directly from tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod forward;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

use axum::{Router, extract::Request};
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, CorsPolicy, ProxyConfig};
pub use error::ProxyError;
pub use server::ServeError;
pub use state::AppState;

/// Build the complete proxy application with its middleware stack.
pub fn app(state: AppState) -> Router {
    let router = Router::new().merge(routes::routes());

    middleware::apply_cors(router, &state.config().cors)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::*;

    fn test_app(cors: CorsPolicy) -> Router {
        let config = ProxyConfig {
            cors,
            ..ProxyConfig::from_lookup(|_| None).unwrap()
        };
        app(AppState::new(config).unwrap())
    }

    fn request(method: Method, uri: &str) -> Request {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ORIGIN, "http://localhost:8081")
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_ok_with_cors() {
        let response = test_app(CorsPolicy::Permissive)
            .oneshot(request(Method::GET, "/health"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert!(response.headers().contains_key("x-request-id"));

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["message"], "wardrobe proxy is running");
        assert!(body["timestamp"].as_str().is_some());
        assert_eq!(body["upstream"], "https://forge.matrix-net.tech/");
    }

    #[tokio::test]
    async fn test_bare_options_answered_locally() {
        let response = test_app(CorsPolicy::Permissive)
            .oneshot(request(Method::OPTIONS, "/api/graphql"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_permissive_headers_on_every_response() {
        for (uri, status) in [("/health", StatusCode::OK), ("/nope", StatusCode::NOT_FOUND)] {
            let response = test_app(CorsPolicy::Permissive)
                .oneshot(request(Method::GET, uri))
                .await
                .unwrap();

            assert_eq!(response.status(), status);
            let headers = response.headers();
            assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
            assert_eq!(
                headers[header::ACCESS_CONTROL_ALLOW_METHODS],
                "GET, POST, PUT, DELETE, OPTIONS"
            );
            assert_eq!(
                headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
                "Content-Type, Authorization, Accept"
            );
        }
    }

    #[tokio::test]
    async fn test_allow_list_lists_methods_only_on_preflight() {
        let policy = CorsPolicy::AllowList(vec![header::HeaderValue::from_static(
            "http://localhost:8081",
        )]);
        let response = test_app(policy)
            .oneshot(request(Method::GET, "/health"))
            .await
            .unwrap();

        assert!(
            !response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS)
        );
    }

    #[tokio::test]
    async fn test_preflight_lists_methods_and_headers() {
        let preflight = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/graphql")
            .header(header::ORIGIN, "http://localhost:8081")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();

        let response = test_app(CorsPolicy::Permissive)
            .oneshot(preflight)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_string();
        for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
            assert!(methods.contains(method), "missing {method} in {methods}");
        }
        let allowed = response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_lowercase();
        assert!(allowed.contains("content-type"));
        assert!(allowed.contains("authorization"));
    }

    #[tokio::test]
    async fn test_allow_list_echoes_origin_with_credentials() {
        let policy = CorsPolicy::AllowList(vec![header::HeaderValue::from_static(
            "http://localhost:8081",
        )]);
        let response = test_app(policy)
            .oneshot(request(Method::GET, "/health"))
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:8081"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }

    #[tokio::test]
    async fn test_allow_list_rejects_other_origins() {
        let policy = CorsPolicy::AllowList(vec![header::HeaderValue::from_static(
            "http://localhost:19006",
        )]);
        let response = test_app(policy)
            .oneshot(request(Method::GET, "/health"))
            .await
            .unwrap();

        assert!(
            !response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_404() {
        let response = test_app(CorsPolicy::Permissive)
            .oneshot(request(Method::GET, "/graphql"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        let body = body_json(response).await;
        assert_eq!(body["error"], "not found");
        assert_eq!(body["path"], "/graphql");
    }

    #[tokio::test]
    async fn test_request_id_is_reused() {
        let mut req = request(Method::GET, "/health");
        req.headers_mut()
            .insert("x-request-id", header::HeaderValue::from_static("req-123"));

        let response = test_app(CorsPolicy::Permissive).oneshot(req).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "req-123");
    }
}
