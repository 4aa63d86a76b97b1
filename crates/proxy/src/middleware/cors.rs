//! CORS layer construction.
//!
//! Wrapper around tower-http CORS driven by [`CorsPolicy`]. The CORS layer
//! answers every `OPTIONS` request itself, so those never reach the
//! forwarder.

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

use crate::config::CorsPolicy;

/// Methods the Expo web client uses.
const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// `Access-Control-Allow-Methods` sent on every permissive response.
const ALLOW_METHODS_VALUE: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// `Access-Control-Allow-Headers` sent on every permissive response.
const ALLOW_HEADERS_VALUE: &str = "Content-Type, Authorization, Accept";

/// Create the CORS layer for a policy.
///
/// Permissive mode sends `Access-Control-Allow-Origin: *` and cannot allow
/// credentials; allow-list mode echoes matching origins and allows them.
pub fn create_cors_layer(policy: &CorsPolicy) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    match policy {
        CorsPolicy::Permissive => cors.allow_origin(Any),
        CorsPolicy::AllowList(origins) => cors
            .allow_origin(AllowOrigin::list(origins.iter().cloned()))
            .allow_credentials(true),
    }
}

/// Wrap `router` in the CORS handling for `policy`.
///
/// tower-http only lists allowed methods and headers on preflights. In
/// permissive mode they are added to every response as well, errors and
/// `/health` included.
pub fn apply_cors<S>(router: Router<S>, policy: &CorsPolicy) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let router = router.layer(create_cors_layer(policy));

    match policy {
        CorsPolicy::Permissive => router
            .layer(SetResponseHeaderLayer::if_not_present(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS_VALUE),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOW_HEADERS_VALUE),
            )),
        CorsPolicy::AllowList(_) => router,
    }
}
