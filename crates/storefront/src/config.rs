//! Storefront client configuration.
//!
//! # Environment Variables
//!
//! - `WARDROBE_API_BASE_URL` - Directus base URL (default: <https://forge.matrix-net.tech>,
//!   falls back to `EXPO_PUBLIC_API_BASE_URL`)
//! - `WARDROBE_AUTH_TOKEN` - Static bearer token (falls back to `EXPO_PUBLIC_AUTH_TOKEN`)
//! - `WARDROBE_PROXY_URL` - Route GraphQL calls through the dev proxy at this URL

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Directus instance used when nothing is configured.
pub const DEFAULT_API_BASE_URL: &str = "https://forge.matrix-net.tech";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where and how the client reaches Directus.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Directus base URL. Assets are always fetched from here.
    pub api_base_url: Url,
    /// Bearer token sent with every GraphQL request
    pub access_token: Option<SecretString>,
    /// Dev proxy; when set, GraphQL goes to `{proxy}/api/graphql[/system]`
    pub proxy_url: Option<Url>,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("proxy_url", &self.proxy_url.as_ref().map(Url::as_str))
            .finish()
    }
}

impl StorefrontConfig {
    /// Configuration talking directly to `api_base_url` without a token.
    #[must_use]
    pub const fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            access_token: None,
            proxy_url: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a URL variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a URL variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let (base_key, base) = non_empty(lookup("WARDROBE_API_BASE_URL"))
            .map(|value| ("WARDROBE_API_BASE_URL", value))
            .or_else(|| {
                non_empty(lookup("EXPO_PUBLIC_API_BASE_URL"))
                    .map(|value| ("EXPO_PUBLIC_API_BASE_URL", value))
            })
            .unwrap_or(("WARDROBE_API_BASE_URL", DEFAULT_API_BASE_URL.to_string()));
        let api_base_url = parse_http_url(base_key, &base)?;

        let access_token = non_empty(lookup("WARDROBE_AUTH_TOKEN"))
            .or_else(|| non_empty(lookup("EXPO_PUBLIC_AUTH_TOKEN")))
            .map(SecretString::from);

        let proxy_url = non_empty(lookup("WARDROBE_PROXY_URL"))
            .map(|raw| parse_http_url("WARDROBE_PROXY_URL", &raw))
            .transpose()?;

        Ok(Self {
            api_base_url,
            access_token,
            proxy_url,
        })
    }

    /// Set the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::from(token.into()));
        self
    }

    /// Route GraphQL requests through the dev proxy.
    #[must_use]
    pub fn via_proxy(mut self, proxy_url: Url) -> Self {
        self.proxy_url = Some(proxy_url);
        self
    }

    /// Items endpoint (`/graphql`).
    #[must_use]
    pub fn graphql_endpoint(&self) -> Url {
        join_path(&self.graphql_base(), "/graphql")
    }

    /// System endpoint (`/graphql/system`).
    #[must_use]
    pub fn system_endpoint(&self) -> Url {
        join_path(&self.graphql_base(), "/graphql/system")
    }

    /// Base URL for `/assets/{id}`.
    #[must_use]
    pub const fn assets_base(&self) -> &Url {
        &self.api_base_url
    }

    fn graphql_base(&self) -> Url {
        self.proxy_url.as_ref().map_or_else(
            || self.api_base_url.clone(),
            |proxy| join_path(proxy, "/api"),
        )
    }
}

/// Append `suffix` to the URL path, keeping any existing path as a prefix.
pub(crate) fn join_path(base: &Url, suffix: &str) -> Url {
    let prefix = base.path().trim_end_matches('/');
    let mut url = base.clone();
    url.set_path(&format!("{prefix}{suffix}"));
    url.set_query(None);
    url.set_fragment(None);
    url
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_http_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}
