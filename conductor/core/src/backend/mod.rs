//! Assistant Service Integration
//!
//! Access to the remote assistant service through a common trait, so the
//! [`crate::Conductor`] can be driven by the real HTTP client or by a test
//! double.
//!
//! # Usage
//!
//! ```ignore
//! use cabin_core::backend::{AssistantBackend, BackendConfig, ChatRequest, HttpBackend};
//!
//! let backend = HttpBackend::new(BackendConfig::default())?;
//! let reply = backend.chat(&ChatRequest::new("What is the baggage allowance?", None)).await?;
//! ```

mod http;
mod traits;
mod wire;

pub use http::HttpBackend;
pub use traits::{AssistantBackend, BackendConfig, BackendError, DEFAULT_BASE_URL};
pub use wire::{ChatRequest, ChatResponse, FeedbackReport};
