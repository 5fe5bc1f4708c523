//! Client Configuration
//!
//! API base URL and request ceiling. The browser has no process environment,
//! so the base URL is baked in at build time.

use std::time::Duration;

use thiserror::Error;

/// Local development backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/api";

/// Fixed per-request ceiling
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("API base URL is empty")]
    EmptyBaseUrl,
    #[error("API base URL must start with http:// or https://, got `{0}`")]
    InvalidScheme(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Config from `WASTEWISE_API_BASE_URL` as seen by the compiler
    ///
    /// `option_env!` only accepts a string literal, so the variable name is
    /// spelled out here rather than kept in a constant.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = option_env!("WASTEWISE_API_BASE_URL")
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::default().with_base_url(base_url)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidScheme(base_url));
        }
        self.base_url = base_url;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join base URL and an endpoint path with exactly one slash
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_with_single_slash() {
        let config = ClientConfig::default()
            .with_base_url("https://api.example.com/v1/")
            .unwrap();
        assert_eq!(config.endpoint("/auth/login"), "https://api.example.com/v1/auth/login");
        assert_eq!(config.endpoint("auth/me"), "https://api.example.com/v1/auth/me");
    }

    #[test]
    fn test_rejects_bad_base_urls() {
        assert_eq!(
            ClientConfig::default().with_base_url("  "),
            Err(ConfigError::EmptyBaseUrl)
        );
        assert!(matches!(
            ClientConfig::default().with_base_url("ftp://files"),
            Err(ConfigError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
