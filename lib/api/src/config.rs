//! API client configuration.
//!
//! Loaded via the `config` crate from environment variables, e.g.
//! `AGENTDESK__API__BASE_URL=https://app.example.com`.

use serde::Deserialize;
use std::time::Duration;

/// Connection settings for the dashboard backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Backend origin; endpoint paths (`/api/...`) are appended to it.
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("agentdesk/", env!("CARGO_PKG_VERSION")).to_string()
}

impl ApiConfig {
    /// Creates a configuration with defaults for everything but the URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }

    /// Request timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Loads the `api` section from `AGENTDESK__API__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is missing or a value fails to parse.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("AGENTDESK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .get::<Self>("api")
    }
}
