//! API client for the remote users endpoint.
//!
//! This module provides the `ApiClient` struct for fetching the user list
//! payload. Requests are made once; nothing is retried.

use std::time::Duration;

use reqwest::{header, Client};
use serde_json::Value;
use tracing::{debug, warn};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default users endpoint
pub const DEFAULT_USERS_URL: &str = "https://reqres.in/api/users";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Header carrying the optional API key
const API_KEY_HEADER: &str = "x-api-key";

/// API client for the users endpoint.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    users_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    /// Create a new API client for the given users URL
    pub fn new(users_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            users_url: users_url.into(),
            api_key: None,
        })
    }

    /// Send the given API key with every request
    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn users_url(&self) -> &str {
        &self.users_url
    }

    fn request_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(ref key) = self.api_key {
            let value = header::HeaderValue::from_str(key)
                .map_err(|e| ApiError::InvalidRequest(format!("Invalid API key header: {}", e)))?;
            headers.insert(API_KEY_HEADER, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_status(status, &body);
            if let ApiError::Status { ref body, .. } = err {
                warn!(status = status.as_u16(), body = %body, "Users request failed");
            }
            Err(err)
        }
    }

    /// Fetch the raw users payload.
    ///
    /// Returns the body as untyped JSON; the caller decides whether its shape
    /// is acceptable.
    pub async fn fetch_users_payload(&self) -> Result<Value, ApiError> {
        debug!(url = %self.users_url, "Requesting users");

        let response = self
            .client
            .get(&self.users_url)
            .headers(self.request_headers()?)
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Body is not JSON: {}", e)))
    }
}
