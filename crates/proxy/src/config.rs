//! Proxy configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `WARDROBE_PROXY_HOST` - Bind address (default: 127.0.0.1)
//! - `WARDROBE_PROXY_PORT` - Listen port (default: 3001, falls back to `EXPO_PUBLIC_PROXY_PORT`)
//! - `WARDROBE_PROXY_TARGET` - Upstream base URL (default: <https://forge.matrix-net.tech>,
//!   falls back to `EXPO_PUBLIC_API_BASE_URL`)
//! - `WARDROBE_PROXY_TIMEOUT_SECS` - Upstream idle timeout in seconds (default: 30)
//! - `WARDROBE_PROXY_CORS_ORIGINS` - Comma-separated origin allow-list. Unset or `*`
//!   means any origin without credentials.
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

/// Default upstream the mobile app talks to.
pub const DEFAULT_TARGET: &str = "https://forge.matrix-net.tech";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "3001";
const DEFAULT_TIMEOUT_SECS: &str = "30";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which origins receive CORS headers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CorsPolicy {
    /// `Access-Control-Allow-Origin: *`, no credentials.
    #[default]
    Permissive,
    /// Only the listed origins, with credentials allowed.
    AllowList(Vec<HeaderValue>),
}

/// Proxy application configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Upstream base URL; `/api/<rest>` is forwarded to `<target>/<rest>`
    pub target: Url,
    /// How long to wait on an idle upstream connection
    pub upstream_timeout: Duration,
    /// CORS origin policy
    pub cors: CorsPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl ProxyConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get_or_default(&lookup, "WARDROBE_PROXY_HOST", DEFAULT_HOST)
            .parse::<IpAddr>()
            .map_err(|e| invalid("WARDROBE_PROXY_HOST", e))?;

        let (port_key, port) =
            get_with_fallback(&lookup, "WARDROBE_PROXY_PORT", "EXPO_PUBLIC_PROXY_PORT")
                .unwrap_or(("WARDROBE_PROXY_PORT", DEFAULT_PORT.to_string()));
        let port = port.parse::<u16>().map_err(|e| invalid(port_key, e))?;

        let (target_key, target) =
            get_with_fallback(&lookup, "WARDROBE_PROXY_TARGET", "EXPO_PUBLIC_API_BASE_URL")
                .unwrap_or(("WARDROBE_PROXY_TARGET", DEFAULT_TARGET.to_string()));
        let target = parse_target(target_key, &target)?;

        let timeout_secs = get_or_default(
            &lookup,
            "WARDROBE_PROXY_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        )
        .parse::<u64>()
        .map_err(|e| invalid("WARDROBE_PROXY_TIMEOUT_SECS", e))?;
        if timeout_secs == 0 {
            return Err(invalid("WARDROBE_PROXY_TIMEOUT_SECS", "must be at least 1"));
        }

        let cors = lookup("WARDROBE_PROXY_CORS_ORIGINS")
            .map_or(Ok(CorsPolicy::Permissive), |raw| parse_cors_origins(&raw))?;

        Ok(Self {
            host,
            port,
            target,
            upstream_timeout: Duration::from_secs(timeout_secs),
            cors,
            sentry_dsn: non_empty(lookup("SENTRY_DSN")),
            sentry_environment: non_empty(lookup("SENTRY_ENVIRONMENT")),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    non_empty(lookup(key)).unwrap_or_else(|| default.to_string())
}

/// Get a variable, falling back to the name the Expo app uses.
///
/// Returns the key the value was read from so errors can name it.
fn get_with_fallback<'k>(
    lookup: &impl Fn(&str) -> Option<String>,
    primary_key: &'k str,
    fallback_key: &'k str,
) -> Option<(&'k str, String)> {
    non_empty(lookup(primary_key))
        .map(|value| (primary_key, value))
        .or_else(|| non_empty(lookup(fallback_key)).map(|value| (fallback_key, value)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn invalid(key: &str, err: impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), err.to_string())
}

/// Parse and validate the upstream base URL.
fn parse_target(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| invalid(key, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            key,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(invalid(key, "URL must have a host"));
    }
    Ok(url)
}

/// Parse the comma-separated origin allow-list.
fn parse_cors_origins(raw: &str) -> Result<CorsPolicy, ConfigError> {
    let origins: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .collect();

    if origins.is_empty() || origins.contains(&"*") {
        return Ok(CorsPolicy::Permissive);
    }

    origins
        .into_iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|e| invalid("WARDROBE_PROXY_CORS_ORIGINS", e))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(CorsPolicy::AllowList)
}
