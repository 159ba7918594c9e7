//! HTTP Backend
//!
//! reqwest client for the assistant service's JSON API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::traits::{AssistantBackend, BackendConfig, BackendError};
use super::wire::{ChatRequest, ChatResponse, FeedbackReport};

/// Longest error body kept in [`BackendError::Status`]
const MAX_ERROR_BODY: usize = 512;

/// Assistant service reached over HTTP
#[derive(Clone, Debug)]
pub struct HttpBackend {
    config: BackendConfig,
    http_client: reqwest::Client,
}

impl HttpBackend {
    /// Create a client for the configured service
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Connection settings in use
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, BackendError> {
        let url = self.config.endpoint(path);
        let response = self.http_client.post(&url).json(body).send().await?;
        ensure_success(response).await
    }
}

#[async_trait]
impl AssistantBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn health_check(&self) -> bool {
        let url = self.config.endpoint("/health");
        match self.http_client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, url = %url, "Health check failed");
                false
            }
        }
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        let response = self.post_json("/chat", request).await?;
        decode(response).await
    }

    async fn submit_feedback(&self, report: &FeedbackReport) -> Result<(), BackendError> {
        self.post_json("/feedback", report).await?;
        Ok(())
    }
}

/// Turn a non-2xx response into [`BackendError::Status`]
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }

    Err(BackendError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Decode a JSON body, reporting shape mismatches as malformed responses
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| BackendError::MalformedResponse(e.to_string()))
}
