//! Classification client configuration.

use scribble_core::PREDICT_PATH;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid server URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Where and how to reach the classification service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Full URL of the predict endpoint.
    pub endpoint: Url,
    /// Request timeout. `None` waits for as long as the transport allows.
    pub timeout: Option<Duration>,
}

impl ClassifierConfig {
    /// Build a config from the service origin.
    ///
    /// Accepts `http://host:port`, `https://host` (any letter case), or a bare
    /// `host:port` (assumed `http`). Any path on the base is replaced by the
    /// predict path.
    pub fn from_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = base_url.trim();
        // Schemes are case-insensitive; `Url::parse` normalizes them.
        let with_scheme = if base_url.contains("://") {
            base_url.to_string()
        } else {
            format!("http://{}", base_url)
        };

        let invalid = |source| ConfigError::InvalidUrl {
            url: base_url.to_string(),
            source,
        };
        let base = Url::parse(&with_scheme).map_err(invalid)?;
        let endpoint = base.join(PREDICT_PATH).map_err(invalid)?;

        Ok(Self {
            endpoint,
            timeout: None,
        })
    }

    /// Set a request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
