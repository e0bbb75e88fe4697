//! HTTP client shared by the upstream providers
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Optional bearer token authentication
//! - Status classification into upstream errors (single attempt, no retries)

use crate::error::UpstreamError;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (30 seconds)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
const DEFAULT_USER_AGENT: &str = concat!("bumper/", env!("CARGO_PKG_VERSION"));

/// HTTP client wrapper
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, UpstreamError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                UpstreamError::request("", format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Perform a GET request and decode the JSON body.
    ///
    /// Status >= 500 is a provider error, any other non-200 status means the
    /// version could not be found there.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        api_key: Option<&str>,
    ) -> Result<T, UpstreamError> {
        debug!("GET {}", url);

        let mut request = self.client.get(url);
        if let Some(key) = api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::request(url, e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(UpstreamError::Provider {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        if status != StatusCode::OK {
            return Err(UpstreamError::not_found(format!(
                "GET {} status {}",
                url,
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::request(url, e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| UpstreamError::invalid_response(url, e.to_string()))
    }
}
