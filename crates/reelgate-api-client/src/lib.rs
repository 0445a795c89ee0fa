//! Shared HTTP client for the Reelgate upload API.
//!
//! Provides a minimal client with Bearer authentication, GET and multipart
//! POST helpers, and the two domain calls of the upload contract
//! (`upload_trailer`, `get_upload_progress`). The upload controller uses it
//! through the `UploadBackend` trait.

pub mod api;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reelgate_core::{TransferProgress, UploaderConfig};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

pub use api::{PICTURES_FIELD, VIDEOS_FIELD};

/// Callback invoked while a multipart body is being streamed out.
pub type TransferObserver = Arc<dyn Fn(TransferProgress) + Send + Sync>;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to create HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Failed to send request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Status {
        status: u16,
        /// `message` field of a JSON error body, if the backend sent one.
        message: Option<String>,
        body: String,
    },

    #[error("Failed to parse response as JSON: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Invalid upload part: {0}")]
    InvalidPart(#[source] reqwest::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn backend_message(&self) -> Option<String> {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            _ => None,
        }
    }
}

/// Pull `message` out of a JSON error body.
fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// HTTP client for the upload API.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
    transfer_observer: Option<TransferObserver>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("transfer_observer", &self.transfer_observer.is_some())
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(
            base_url,
            token,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Build)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            transfer_observer: None,
        })
    }

    pub fn from_config(config: &UploaderConfig) -> Result<Self, ApiError> {
        Self::with_timeout(&config.api_url, &config.token, config.request_timeout)
    }

    /// Create client from environment; see `UploaderConfig::from_env`.
    pub fn from_env() -> Result<Self> {
        let config = UploaderConfig::from_env()?;
        Ok(Self::from_config(&config)?)
    }

    /// Report transfer progress of multipart uploads to `observer`.
    pub fn with_transfer_observer(mut self, observer: TransferObserver) -> Self {
        self.transfer_observer = Some(observer);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn transfer_observer(&self) -> Option<&TransferObserver> {
        self.transfer_observer.as_ref()
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("Authorization", format!("Bearer {}", self.token))
    }

    /// Send and accept only the listed statuses; anything else becomes `ApiError::Status`.
    async fn send_expecting(
        &self,
        request: RequestBuilder,
        accepted: &[StatusCode],
    ) -> Result<Response, ApiError> {
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        if !accepted.contains(&status) {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: extract_message(&body),
                body,
            });
        }

        Ok(response)
    }

    /// GET request with optional query parameters. Deserializes a 200 JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.build_url(path);
        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }

        tracing::debug!(url = %url, "GET");
        let response = self.send_expecting(request, &[StatusCode::OK]).await?;
        response.json().await.map_err(ApiError::Decode)
    }

    /// POST multipart form and deserialize a 200/201 JSON response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let url = self.build_url(path);
        let request = self.client.post(&url).multipart(form);

        tracing::debug!(url = %url, "POST multipart");
        let response = self
            .send_expecting(request, &[StatusCode::OK, StatusCode::CREATED])
            .await?;
        response.json().await.map_err(ApiError::Decode)
    }
}
