//! Storefront data layer configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `THREADLINE_API_URL` - Base URL of the REST API (e.g., `https://shop.example.com`)
//!
//! ## Optional
//! - `THREADLINE_API_TOKEN` - Bearer token sent with every request
//! - `THREADLINE_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `THREADLINE_CACHE_CAPACITY` - Maximum cached query entries (default: 1000)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Data layer configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// REST API base URL, without a trailing slash
    pub api_url: String,
    /// Optional bearer token for authenticated endpoints
    pub api_token: Option<SecretString>,
    /// HTTP request timeout
    pub http_timeout: Duration,
    /// Maximum number of entries held by the query cache
    pub cache_capacity: u64,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("http_timeout", &self.http_timeout)
            .field("cache_capacity", &self.cache_capacity)
            .finish()
    }
}

impl StorefrontConfig {
    /// Build a configuration in code with default timeout and capacity.
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_base_url(&api_url.into()),
            api_token: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }

    /// Attach a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(SecretString::from(token.into()));
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_required_env("THREADLINE_API_URL")?;
        url::Url::parse(&api_url).map_err(|e| {
            ConfigError::InvalidEnvVar("THREADLINE_API_URL".to_string(), e.to_string())
        })?;

        let http_timeout = get_env_or_default(
            "THREADLINE_HTTP_TIMEOUT_SECS",
            &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("THREADLINE_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        let cache_capacity = get_env_or_default(
            "THREADLINE_CACHE_CAPACITY",
            &DEFAULT_CACHE_CAPACITY.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("THREADLINE_CACHE_CAPACITY".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_url: normalize_base_url(&api_url),
            api_token: get_optional_env("THREADLINE_API_TOKEN").map(SecretString::from),
            http_timeout: Duration::from_secs(http_timeout),
            cache_capacity,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Strip trailing slashes so paths like `/api/products` can be appended directly.
fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = StorefrontConfig::new("http://localhost:4000///");
        assert_eq!(config.api_url, "http://localhost:4000");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.cache_capacity, 1000);
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = StorefrontConfig::new("http://localhost:4000").with_token("super_secret_token");
        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("localhost:4000"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token"));
    }

    #[test]
    fn test_missing_env_var_message() {
        let err = get_required_env("THREADLINE_TEST_SURELY_UNSET_VAR").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing environment variable: THREADLINE_TEST_SURELY_UNSET_VAR"
        );
    }
}
