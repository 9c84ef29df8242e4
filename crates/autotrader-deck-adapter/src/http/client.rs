/*
[INPUT]:  HTTP configuration (base URL, timeouts, optional bearer token)
[OUTPUT]: Configured reqwest client ready for dashboard API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::http::{DeckError, Result};

/// Default backend location used when no base URL is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Credentials for authenticated requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_token: String,
}

/// HTTP client for the trading backend's dashboard API
#[derive(Debug, Clone)]
pub struct DeckClient {
    http_client: Client,
    base_url: Url,
    credentials: Option<Credentials>,
    timeout: Duration,
}

impl DeckClient {
    /// Create a new client against the default base URL
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default(), DEFAULT_BASE_URL)
    }

    /// Create a new client with custom configuration and base URL
    pub fn with_config(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: Url::parse(base_url)?,
            credentials: None,
            timeout: config.timeout,
        })
    }

    /// Set credentials for authenticated requests
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    /// Get credentials if set
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> std::result::Result<Url, url::ParseError> {
        self.base_url.join(endpoint)
    }

    /// Build a request builder, attaching the bearer token when one is set
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.url(endpoint)?;
        let builder = self.http_client.request(method, url);
        Ok(match &self.credentials {
            Some(credentials) => builder.bearer_auth(&credentials.api_token),
            None => builder,
        })
    }

    /// Send a request and decode the JSON body.
    ///
    /// Non-2xx statuses become [`DeckError::Api`] carrying the body text.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() {
                DeckError::Timeout {
                    duration: self.timeout.as_secs(),
                }
            } else {
                DeckError::Http(err)
            }
        })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            debug!(status = status.as_u16(), bytes = body.len(), "backend returned error status");
            return Err(DeckError::api_error(status, body));
        }

        serde_json::from_str(&body).map_err(DeckError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_endpoint_onto_base() {
        let client = DeckClient::with_config(ClientConfig::default(), "http://127.0.0.1:9000")
            .expect("client init");
        let url = client.url("/api/trader/status").expect("url");
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/api/trader/status");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = DeckClient::with_config(ClientConfig::default(), "not a url").unwrap_err();
        assert!(matches!(err, DeckError::UrlParse(_)));
    }
}
