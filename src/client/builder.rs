//! Builder for configuring content clients

use std::sync::Arc;
use std::time::Duration;

use super::content::ContentClient;
use super::transport::{DEFAULT_TIMEOUT, HttpTransport, Transport};
use crate::cache::CacheConfig;
use crate::config::Config;
use crate::{LyceumError, Result};

/// Main entry point for creating client instances.
pub struct Lyceum;

impl Lyceum {
    /// Create a new builder for configuring the client.
    pub fn builder() -> LyceumBuilder {
        LyceumBuilder::new()
    }
}

/// Builder for configuring client instances.
///
/// ```rust
/// # use lyceum::Lyceum;
/// # use lyceum::cache::CacheConfig;
/// let client = Lyceum::builder()
///     .base_url("http://localhost:5000/api")
///     .timeout(10)
///     .cache(CacheConfig::new().max_entries(1_000))
///     .build();
/// assert!(client.is_ok());
/// ```
pub struct LyceumBuilder {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    cache: CacheConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl LyceumBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout_secs: None,
            cache: CacheConfig::default(),
            transport: None,
        }
    }

    /// Seed the builder from a loaded [`Config`].
    ///
    /// Later builder calls override values taken from the config.
    pub fn config(mut self, config: &Config) -> Self {
        self.base_url = Some(config.api.base_url.clone());
        self.timeout_secs = Some(config.api.timeout_secs);
        self.cache = config.cache.to_cache_config();
        self
    }

    /// Base URL of the content API, including any `/api` prefix.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set request timeout (seconds).
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set the response cache configuration.
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    /// Use a custom transport instead of HTTP. `base_url` and `timeout`
    /// are ignored when set.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ContentClient> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let base_url = self.base_url.ok_or_else(|| {
                    LyceumError::Configuration("no API base URL configured".to_string())
                })?;
                if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                    return Err(LyceumError::Configuration(format!(
                        "API base URL must be http(s): '{base_url}'"
                    )));
                }
                let timeout = self
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_TIMEOUT);
                Arc::new(HttpTransport::new(base_url, timeout)?)
            }
        };

        Ok(ContentClient::new(transport, &self.cache))
    }
}

impl Default for LyceumBuilder {
    fn default() -> Self {
        Self::new()
    }
}
