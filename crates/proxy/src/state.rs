//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::config::ProxyConfig;

/// Time allowed to establish the upstream TCP/TLS connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and holds the configuration and
/// the single upstream HTTP client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ProxyConfig,
    client: reqwest::Client,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The upstream client never follows redirects; `3xx` responses are
    /// relayed to the caller unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed (e.g., the
    /// TLS backend fails to initialize).
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(config.upstream_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, client }),
        })
    }

    /// Get a reference to the proxy configuration.
    #[must_use]
    pub fn config(&self) -> &ProxyConfig {
        &self.inner.config
    }

    /// Get a reference to the upstream base URL.
    #[must_use]
    pub fn target(&self) -> &Url {
        &self.inner.config.target
    }

    /// Get a reference to the upstream HTTP client.
    #[must_use]
    pub fn client(&self) -> &reqwest::Client {
        &self.inner.client
    }
}
