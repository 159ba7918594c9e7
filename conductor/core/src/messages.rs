//! Transcript Messages
//!
//! The unit every rendered surface derives from. A message is immutable once
//! it has been appended to the transcript.
//!
//! # Ordering
//!
//! The `timestamp` is a display string only. Position in the transcript is
//! the authoritative chronological order.

use serde::{Deserialize, Serialize};

/// Fixed apology shown when a chat exchange fails
pub const CHAT_ERROR_MESSAGE: &str =
    "Sorry, I encountered an error. Please make sure the backend is running.";

/// Unique message identifier (rendering key, not an ordering key)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Generate a new unique message ID
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        Self(format!("msg_{id}"))
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Who sent a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Typed by the user
    User,
    /// Returned by the assistant service, or synthesized locally on failure
    Assistant,
}

/// A single transcript entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: MessageId,
    /// Who sent this message
    pub role: MessageRole,
    /// Message content (assistant content may carry lightweight markup)
    pub content: String,
    /// Display-formatted creation time (`HH:MM`)
    pub timestamp: String,
    /// Confidence score in `[0, 1]`, only on scored assistant replies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Marks a locally synthesized failure message
    #[serde(default)]
    pub error: bool,
}

impl Message {
    fn build(role: MessageRole, content: String) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content,
            timestamp: display_time(),
            confidence: None,
            error: false,
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::build(MessageRole::User, content.into())
    }

    /// Create an assistant message without a confidence score
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::build(MessageRole::Assistant, content.into())
    }

    /// Create an assistant reply carrying the service's confidence score
    ///
    /// Scores are clamped into `[0, 1]`; non-finite scores are dropped.
    pub fn reply(content: impl Into<String>, confidence: Option<f64>) -> Self {
        let mut msg = Self::build(MessageRole::Assistant, content.into());
        msg.confidence = confidence
            .filter(|c| c.is_finite())
            .map(|c| c.clamp(0.0, 1.0));
        msg
    }

    /// Create the synthetic apology appended when a chat exchange fails
    pub fn chat_error() -> Self {
        let mut msg = Self::build(MessageRole::Assistant, CHAT_ERROR_MESSAGE.to_string());
        msg.error = true;
        msg
    }

    /// Confidence as a rounded percentage, if present
    pub fn confidence_percent(&self) -> Option<u8> {
        self.confidence.map(|c| (c * 100.0).round() as u8)
    }
}

/// Current local time formatted for display
fn display_time() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}
