//! Request rewriting for the `/api` forwarder.
//!
//! These functions are pure so the path and header rules can be tested
//! without a network.

use axum::http::{HeaderMap, HeaderName, header};
use url::Url;

/// Path prefix that is forwarded upstream.
pub const API_PREFIX: &str = "/api";

/// Headers that describe a single hop and must not be forwarded (RFC 9110 §7.6.1).
const HOP_BY_HOP: &[HeaderName] = &[
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Strip the leading `/api` segment from a request path.
///
/// `/api` maps to `/`. Paths that merely start with the letters (`/apix`) or
/// contain `/api` further in are not forwarded.
#[must_use]
pub fn strip_api_prefix(path: &str) -> Option<&str> {
    match path.strip_prefix(API_PREFIX)? {
        "" => Some("/"),
        rest if rest.starts_with('/') => Some(rest),
        _ => None,
    }
}

/// Join a stripped path onto the upstream base URL.
///
/// Any path on the base URL is kept as a prefix, and the original query
/// string is carried over byte for byte.
#[must_use]
pub fn upstream_url(target: &Url, path: &str, query: Option<&str>) -> Url {
    let base = target.path().trim_end_matches('/');
    let mut url = target.clone();
    url.set_path(&format!("{base}{path}"));
    url.set_query(query);
    url.set_fragment(None);
    url
}

/// Headers to send upstream.
///
/// Drops hop-by-hop headers, anything named in `Connection`, and `Host`
/// (the client sets it from the upstream URL).
#[must_use]
pub fn filter_request_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = strip_hop_by_hop(headers);
    filtered.remove(header::HOST);
    filtered
}

/// Headers to relay back to the caller.
///
/// Drops hop-by-hop headers and the upstream's own `Access-Control-*`
/// headers; the proxy's CORS layer decides those.
#[must_use]
pub fn filter_response_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = strip_hop_by_hop(headers);
    let cors: Vec<HeaderName> = filtered
        .keys()
        .filter(|name| name.as_str().starts_with("access-control-"))
        .cloned()
        .collect();
    for name in cors {
        filtered.remove(name);
    }
    filtered
}

/// Whether the incoming request carries a body worth streaming.
#[must_use]
pub fn has_body(headers: &HeaderMap) -> bool {
    if headers.contains_key(header::TRANSFER_ENCODING) {
        return true;
    }
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .is_some_and(|len| len > 0)
}

fn strip_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = headers.clone();

    // Headers listed in Connection are hop-by-hop for this message only
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in HOP_BY_HOP.iter().chain(listed.iter()) {
        filtered.remove(name);
    }
    filtered.remove("keep-alive");
    filtered
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_strip_api_prefix() {
        assert_eq!(strip_api_prefix("/api/graphql"), Some("/graphql"));
        assert_eq!(strip_api_prefix("/api/graphql/system"), Some("/graphql/system"));
        assert_eq!(strip_api_prefix("/api"), Some("/"));
        assert_eq!(strip_api_prefix("/api/"), Some("/"));
        assert_eq!(strip_api_prefix("/apix"), None);
        assert_eq!(strip_api_prefix("/graphql/api/x"), None);
        assert_eq!(strip_api_prefix("/health"), None);
    }

    #[test]
    fn test_strip_only_leading_prefix() {
        // The inner /api segment belongs to the upstream path
        assert_eq!(strip_api_prefix("/api/items/api/1"), Some("/items/api/1"));
    }

    #[test]
    fn test_upstream_url_plain_host() {
        let target = Url::parse("https://forge.matrix-net.tech").unwrap();
        let url = upstream_url(&target, "/graphql/system", None);
        assert_eq!(url.as_str(), "https://forge.matrix-net.tech/graphql/system");
    }

    #[test]
    fn test_upstream_url_keeps_base_path_and_query() {
        let target = Url::parse("http://localhost:8055/directus/").unwrap();
        let url = upstream_url(&target, "/items/products", Some("limit=10&offset=20"));
        assert_eq!(
            url.as_str(),
            "http://localhost:8055/directus/items/products?limit=10&offset=20"
        );
    }

    #[test]
    fn test_upstream_url_drops_target_query() {
        let target = Url::parse("https://example.org/base?stale=1#frag").unwrap();
        let url = upstream_url(&target, "/", None);
        assert_eq!(url.as_str(), "https://example.org/base/");
    }

    #[test]
    fn test_filter_request_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("localhost:3001"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-trace-hop"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("x-trace-hop", HeaderValue::from_static("1"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));

        let filtered = filter_request_headers(&headers);

        assert!(filtered.get(header::HOST).is_none());
        assert!(filtered.get(header::CONNECTION).is_none());
        assert!(filtered.get("keep-alive").is_none());
        assert!(filtered.get("x-trace-hop").is_none());
        assert!(filtered.get(header::TRANSFER_ENCODING).is_none());
        assert_eq!(filtered.get(header::AUTHORIZATION).unwrap(), "Bearer abc");
        assert_eq!(filtered.get(header::CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_filter_response_headers_drops_upstream_cors() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("https://forge.matrix-net.tech"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::SET_COOKIE, HeaderValue::from_static("session=1"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));

        let filtered = filter_response_headers(&headers);

        assert!(filtered.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert!(filtered.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).is_none());
        assert!(filtered.get(header::TRANSFER_ENCODING).is_none());
        assert_eq!(filtered.get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(filtered.get(header::SET_COOKIE).unwrap(), "session=1");
    }

    #[test]
    fn test_has_body() {
        let mut headers = HeaderMap::new();
        assert!(!has_body(&headers));

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("0"));
        assert!(!has_body(&headers));

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("17"));
        assert!(has_body(&headers));

        let mut chunked = HeaderMap::new();
        chunked.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        assert!(has_body(&chunked));
    }
}
