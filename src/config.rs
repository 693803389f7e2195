//! Client configuration.
//!
//! This module defines the configuration for the client core: the backend
//! origin and the bounded wait applied to token refresh.

use thiserror::Error;

/// Default backend origin for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Default bounded wait for a token refresh, in seconds. Exceeding it is
/// treated identically to refresh failure.
pub const DEFAULT_REFRESH_TIMEOUT_SECS: u64 = 10;

/// Environment variable overriding the backend origin.
pub const API_URL_ENV: &str = "JOBTRACK_API_URL";

/// Configuration errors.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{0}': must start with http:// or https://")]
    InvalidBaseUrl(String),
}

/// Configuration for the client core.
///
/// Use the builder pattern to customize behavior.
///
/// # Example
///
/// ```ignore
/// use jobtrack_client::config::ClientConfig;
///
/// let config = ClientConfig::new("https://api.jobtrack.example")?
///     .with_refresh_timeout(5);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base API origin, without a trailing slash.
    pub base_url: String,
    /// Bounded wait for token refresh, in seconds.
    pub refresh_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            refresh_timeout_secs: DEFAULT_REFRESH_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given backend origin.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url: String = base_url.into();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(base_url));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        })
    }

    /// Set the refresh timeout in seconds.
    pub fn with_refresh_timeout(mut self, seconds: u64) -> Self {
        self.refresh_timeout_secs = seconds;
        self
    }

    /// Create a configuration from the environment.
    ///
    /// Reads `JOBTRACK_API_URL`; falls back to the local default when the
    /// variable is unset or invalid.
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) => Self::new(url).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Build a full endpoint URL from an API path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
