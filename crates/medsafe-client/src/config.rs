//! Client configuration.

use std::time::Duration;

use medsafe_core::error::{Error, InvalidInputError};
use medsafe_core::{ApiBaseUrl, Result};

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "API_BASE_URL";

/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "API_TIMEOUT_SECS";

/// Request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for the HTTP transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: ApiBaseUrl,
    /// `None` disables the timeout.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: ApiBaseUrl::default(),
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: concat!("medsafe/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Build a configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset. A timeout of `0` disables it.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = ApiBaseUrl::new(base)?;
        }

        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::from(InvalidInputError::Other {
                    message: format!("{} must be a whole number of seconds, got '{}'", TIMEOUT_ENV, raw),
                })
            })?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: ApiBaseUrl) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}
