//! Assistant Backend Traits
//!
//! Trait definitions for the remote assistant service. The state machine
//! never talks HTTP itself; it emits effects, and the
//! [`crate::Conductor`] runs them against an [`AssistantBackend`].

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use super::wire::{ChatRequest, ChatResponse, FeedbackReport};

/// Default assistant service endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Errors talking to the assistant service
///
/// The state machine does not distinguish between these: any of them on
/// `/chat` is a chat failure, any of them on `/feedback` is logged and
/// dropped.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Could not reach the service, or the connection broke mid-request
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (possibly truncated)
        body: String,
    },

    /// The body did not match the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Assistant service backend
///
/// Implement this to point the Conductor at something other than the HTTP
/// service (tests use in-memory doubles).
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Check if the service is reachable and healthy
    async fn health_check(&self) -> bool;

    /// Send one chat turn and wait for the reply
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError>;

    /// Deliver a satisfaction report; the response body is ignored
    async fn submit_feedback(&self, report: &FeedbackReport) -> Result<(), BackendError>;
}

/// Connection settings for the HTTP backend
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    /// Service base URL, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Whole-request timeout
    pub request_timeout: Duration,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl BackendConfig {
    /// Configuration for a given base URL with default timeouts
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the whole-request timeout
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connect timeout
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Absolute URL for an endpoint path such as `/chat`
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
