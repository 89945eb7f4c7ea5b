//! REST API client for the storefront backend.
//!
//! Thin wrapper around `reqwest` that knows the base URL, attaches the bearer
//! token, and turns non-2xx responses into [`ApiError`] values carrying the
//! server's own error message when one is present.
//!
//! # API Reference
//!
//! - List endpoints (`/api/products`, `/api/orders`, ...) return a JSON array
//! - Detail endpoints (`/api/users/:id`, ...) return a JSON object
//! - Errors are JSON objects with an `error` (or `message`) string field

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::StorefrontConfig;

/// Errors that can occur when talking to the REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response with a message.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// API returned an error response without a usable message.
    #[error("HTTP status {0}")]
    Status(u16),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Failed to parse response or build the request.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// HTTP status code of the failed response, if there was one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Status(status) => Some(*status),
            Self::RateLimited(_) => Some(429),
            Self::Http(_) | Self::Parse(_) => None,
        }
    }

    /// The message the server put in its error body, verbatim.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Whether repeating the same read could succeed.
    ///
    /// Transport failures, 408, 429 and 5xx are transient; other 4xx
    /// responses and parse failures are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => !e.is_builder() && !e.is_decode(),
            Self::RateLimited(_) => true,
            Self::Api { status, .. } | Self::Status(status) => *status == 408 || *status >= 500,
            Self::Parse(_) => false,
        }
    }
}

/// REST API client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        if let Some(token) = &config.api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ApiError::Parse(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.clone(),
            }),
        })
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Execute a GET request.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or a body that
    /// does not deserialize into `T`.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.inner.client.get(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or an
    /// unparseable body.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Execute a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or an
    /// unparseable body.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn patch<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .patch(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Execute a DELETE request.
    ///
    /// An empty success body deserializes as JSON `null`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.inner.client.delete(self.url(path)).send().await?;
        Self::handle_response(response).await
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.inner.base_url)
        } else {
            format!("{}/{path}", self.inner.base_url)
        }
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if !status.is_success() {
            return Err(Self::parse_error(response).await);
        }

        let text = response.text().await?;
        let body = if text.trim().is_empty() { "null" } else { &text };

        serde_json::from_str(body).map_err(|e| {
            debug!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(format!("Failed to parse response: {e}"))
        })
    }

    /// Parse error response from the API.
    async fn parse_error(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();

        // Check for rate limiting
        if status == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(1);
            return ApiError::RateLimited(retry_after);
        }

        let body = response.text().await.unwrap_or_default();
        extract_server_message(&body)
            .map_or(ApiError::Status(status), |message| ApiError::Api {
                status,
                message,
            })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

/// Pull the server's error message out of an error body.
///
/// Accepts `{"error": "..."}`, `{"error": {"message": "..."}}` and
/// `{"message": "..."}`, in that order of preference.
fn extract_server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    let from_error = object.get("error").and_then(|error| match error {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Object(inner) => inner
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned),
        _ => None,
    });

    from_error
        .or_else(|| {
            object
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        })
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_field() {
        assert_eq!(
            extract_server_message(r#"{"error":"Product name is required"}"#).as_deref(),
            Some("Product name is required")
        );
    }

    #[test]
    fn test_extract_prefers_error_over_message() {
        assert_eq!(
            extract_server_message(r#"{"message":"Bad Request","error":"Slug taken"}"#)
                .as_deref(),
            Some("Slug taken")
        );
    }

    #[test]
    fn test_extract_nested_and_message_fallback() {
        assert_eq!(
            extract_server_message(r#"{"error":{"message":"nested"}}"#).as_deref(),
            Some("nested")
        );
        assert_eq!(
            extract_server_message(r#"{"message":"Validation failed"}"#).as_deref(),
            Some("Validation failed")
        );
    }

    #[test]
    fn test_extract_none_for_unusable_bodies() {
        assert!(extract_server_message("").is_none());
        assert!(extract_server_message("<html>502</html>").is_none());
        assert!(extract_server_message(r#"{"error":""}"#).is_none());
        assert!(extract_server_message(r#"["error"]"#).is_none());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ApiError::Status(503).is_retryable());
        assert!(ApiError::RateLimited(1).is_retryable());
        assert!(!ApiError::Status(404).is_retryable());
        assert!(
            !ApiError::Api {
                status: 422,
                message: "invalid".to_string()
            }
            .is_retryable()
        );
        assert!(!ApiError::Parse("bad".to_string()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Api {
            status: 400,
            message: "Coupon expired".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 400 - Coupon expired");
        assert_eq!(err.server_message(), Some("Coupon expired"));
        assert_eq!(ApiError::Status(500).server_message(), None);
    }

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new(&StorefrontConfig::new("http://localhost:4000/")).unwrap();
        assert_eq!(client.url("/api/products"), "http://localhost:4000/api/products");
        assert_eq!(client.url("api/orders"), "http://localhost:4000/api/orders");
    }
}
