//! HTTP client for provider requests.

use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use thiserror::Error;

/// Configuration for the download client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("barvault/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Errors that can occur during a provider request.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider is rate limiting requests.
    #[error("Rate limited (HTTP 429)")]
    RateLimited,

    /// Provider returned a non-success status.
    #[error("Server returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
}

/// HTTP client performing exactly one request per call.
///
/// Failures are returned to the caller unchanged; the retry driver decides
/// whether to try again.
#[derive(Debug, Clone)]
pub struct DownloadClient {
    client: Client,
    config: ClientConfig,
}

impl DownloadClient {
    /// Creates a new download client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Self::new(ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches the body of `url` as text.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure or any non-success status.
    pub async fn get_text(&self, url: Url) -> Result<String, DownloadError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DownloadError::RateLimited);
        }
        if !status.is_success() {
            return Err(DownloadError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("barvault/"));
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = DownloadClient::with_defaults();
        assert!(client.is_ok());
    }
}
