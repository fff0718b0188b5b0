//! HTTP client for the fal.ai queue API.
//!
//! Wraps `reqwest` with the `Authorization: Key ...` credential, endpoint
//! management, and body parsing. Shape detection is left to
//! [`crate::normalize`]; this layer only guarantees a 2xx response whose body
//! is JSON of the expected type.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::GenerationError;
use crate::normalize::{truncate_chars, BACKEND_BODY_LIMIT};
use crate::types::{StatusResponse, SubmitRequest, SubmitResponse};

pub use tryon_core::config::{
    DEFAULT_FAL_STATUS_BASE_URL as DEFAULT_STATUS_BASE_URL,
    DEFAULT_FAL_SUBMIT_URL as DEFAULT_SUBMIT_URL,
};

/// Client for the fal.ai virtual try-on queue.
///
/// Use [`FalClient::new`] for production or [`FalClient::with_endpoints`] to
/// point at a mock server in tests.
#[derive(Clone)]
pub struct FalClient {
    client: Client,
    api_key: String,
    submit_url: Url,
    status_base_url: Url,
}

impl std::fmt::Debug for FalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FalClient")
            .field("api_key", &"[redacted]")
            .field("submit_url", &self.submit_url.as_str())
            .field("status_base_url", &self.status_base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl FalClient {
    /// Creates a new client pointed at the production fal.ai queue.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Transport`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, GenerationError> {
        Self::with_endpoints(
            api_key,
            timeout_secs,
            DEFAULT_SUBMIT_URL,
            DEFAULT_STATUS_BASE_URL,
        )
    }

    /// Creates a new client with custom endpoints (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Transport`] if the underlying
    /// `reqwest::Client` cannot be constructed, or
    /// [`GenerationError::InvalidEndpoint`] if either URL does not parse or
    /// cannot carry path segments.
    pub fn with_endpoints(
        api_key: &str,
        timeout_secs: u64,
        submit_url: &str,
        status_base_url: &str,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tryon/0.1 (virtual-try-on)")
            .build()?;

        let submit_url = parse_endpoint(submit_url)?;
        let status_base_url = parse_endpoint(status_base_url)?;
        if status_base_url.cannot_be_a_base() {
            return Err(GenerationError::InvalidEndpoint {
                url: status_base_url.to_string(),
                reason: "status endpoint cannot carry a request id path segment".to_owned(),
            });
        }

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            submit_url,
            status_base_url,
        })
    }

    /// Submits one try-on job.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::Transport`] on network failure.
    /// - [`GenerationError::BackendRejected`] on a non-2xx status, with the
    ///   body truncated to [`BACKEND_BODY_LIMIT`] characters.
    /// - [`GenerationError::MalformedResponse`] if the body is not JSON of
    ///   the expected shape.
    pub async fn submit(
        &self,
        request: &SubmitRequest<'_>,
    ) -> Result<SubmitResponse, GenerationError> {
        let response = self
            .client
            .post(self.submit_url.clone())
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(
            status = status.as_u16(),
            body = truncate_chars(&body, 500),
            "fal.ai submission response"
        );

        if !status.is_success() {
            return Err(GenerationError::BackendRejected {
                status: status.as_u16(),
                body: truncate_chars(&body, BACKEND_BODY_LIMIT).to_owned(),
            });
        }

        parse_body(&body, "submission")
    }

    /// Fetches the current status of a queued job.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::Transport`] on network failure or a non-2xx status.
    /// - [`GenerationError::MalformedResponse`] if the body is not JSON of
    ///   the expected shape.
    pub async fn status(&self, request_id: &str) -> Result<StatusResponse, GenerationError> {
        let url = self.status_url(request_id);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        parse_body(&body, &format!("status({request_id})"))
    }

    /// Builds `<status_base>/<request_id>`, encoding the id as one path segment.
    fn status_url(&self, request_id: &str) -> Url {
        let mut url = self.status_base_url.clone();
        // Checked at construction: the base can carry path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(request_id);
        }
        url
    }

    fn auth_header(&self) -> String {
        format!("Key {}", self.api_key)
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, GenerationError> {
    Url::parse(raw.trim()).map_err(|e| GenerationError::InvalidEndpoint {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}

fn parse_body<T: serde::de::DeserializeOwned>(
    body: &str,
    context: &str,
) -> Result<T, GenerationError> {
    serde_json::from_str(body).map_err(|e| GenerationError::MalformedResponse {
        context: context.to_owned(),
        source: e,
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
