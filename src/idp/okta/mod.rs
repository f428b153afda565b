//! Okta authentication API client.
//!
//! Every call is a single request awaited to completion; the client keeps no
//! state between calls apart from its configuration.

mod apps;
mod authn;
mod federation;
pub(crate) mod models;

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::constants::USER_AGENT;
use crate::error::{ApiError, Error, Result};

#[derive(Clone)]
pub struct OktaClient {
    /// API root, e.g. `https://example.okta.com/api/v1`
    base_url: String,
    /// SSWS token identifying the calling integration
    api_key: String,
    http_client: Client,
}

impl OktaClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        Url::parse(base_url)
            .map_err(|e| Error::InvalidConfig(format!("Invalid Okta base URL '{base_url}': {e}")))?;
        if api_key.trim().is_empty() {
            return Err(Error::InvalidConfig("Okta API key is empty".to_string()));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::with_http_client(base_url, api_key, http_client))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_http_client(base_url: &str, api_key: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("SSWS {}", self.api_key))
    }

    /// Send an API request and decode the body.
    ///
    /// A body carrying `errorCode` is turned into `rejected(..)` regardless of
    /// the HTTP status.
    async fn send_api<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
        rejected: fn(ApiError) -> Error,
    ) -> Result<T> {
        debug!("Okta {}", endpoint);
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Okta {} responded with {}", endpoint, status);

        let value: serde_json::Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) if !status.is_success() => {
                return Err(Error::UnexpectedStatus {
                    endpoint: endpoint.to_string(),
                    status: status.as_u16(),
                });
            }
            Err(e) => {
                return Err(Error::malformed_response(
                    endpoint,
                    format!("invalid JSON: {e}"),
                ));
            }
        };

        if value.get("errorCode").is_some() {
            let api_error: ApiError = serde_json::from_value(value)
                .map_err(|e| Error::malformed_response(endpoint, e.to_string()))?;
            warn!(
                "Okta {} rejected with {}: {}",
                endpoint, api_error.error_code, api_error.error_summary
            );
            return Err(rejected(api_error));
        }

        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        serde_json::from_value(value).map_err(|e| Error::malformed_response(endpoint, e.to_string()))
    }
}

impl std::fmt::Debug for OktaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OktaClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = OktaClient::with_http_client(
            "https://example.okta.com/api/v1/",
            "key",
            Client::new(),
        );
        assert_eq!(client.base_url(), "https://example.okta.com/api/v1");
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let result = OktaClient::new("example.okta.com", "key", Duration::from_secs(5));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_new_rejects_empty_api_key() {
        let result = OktaClient::new(
            "https://example.okta.com/api/v1",
            "  ",
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = OktaClient::with_http_client(
            "https://example.okta.com/api/v1",
            "super-secret",
            Client::new(),
        );
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
