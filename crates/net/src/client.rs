//! HTTP client with connection pooling

use ferry_config::UploadConfig;
use ferry_errors::{Error, NetworkError};
use reqwest::multipart::Form;
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300), // archives can be large
            connect_timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(90),
            user_agent: format!("ferry/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl NetConfig {
    #[must_use]
    pub fn from_upload(config: &UploadConfig) -> Self {
        Self {
            timeout: config.timeout(),
            connect_timeout: config.connect_timeout(),
            ..Self::default()
        }
    }
}

/// Thin wrapper over `reqwest::Client` that maps failures into ferry errors.
///
/// Requests are sent once. Failover happens one level up, across candidate
/// servers.
#[derive(Clone)]
pub struct NetClient {
    client: Client,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: &NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ClientSetup(e.to_string()))?;

        Ok(Self { client })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(&NetConfig::default())
    }

    /// Execute a GET request
    ///
    /// # Errors
    ///
    /// Returns an error on timeouts, connection failures, or other transport errors.
    /// HTTP error statuses are returned as a normal response.
    pub async fn get(&self, url: &str) -> Result<Response, Error> {
        self.client.get(url).send().await.map_err(map_reqwest_error)
    }

    /// POST a JSON body
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<Response, Error> {
        self.client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)
    }

    /// POST a multipart form
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub async fn post_multipart(&self, url: &str, form: Form) -> Result<Response, Error> {
        self.client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        NetworkError::Timeout {
            url: e
                .url()
                .map(std::string::ToString::to_string)
                .unwrap_or_default(),
        }
        .into()
    } else if e.is_connect() {
        NetworkError::ConnectionRefused(e.to_string()).into()
    } else if e.is_builder() {
        NetworkError::InvalidUrl(e.to_string()).into()
    } else {
        NetworkError::RequestFailed(e.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_upload_section() {
        let upload = UploadConfig::default();
        let config = NetConfig::from_upload(&upload);
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("ferry/"));
    }

    #[tokio::test]
    async fn test_unparseable_url_is_reported() {
        let client = NetClient::with_defaults().unwrap();
        let err = client.get("not a url").await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }
}
