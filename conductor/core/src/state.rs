//! Chat State
//!
//! The complete interaction state as one explicit value: transcript,
//! conversation session, survey, input draft and service reachability.
//! Only [`crate::transition::transition`] changes it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::feedback::{FeedbackFlow, DEFAULT_THANKS_DELAY};
use crate::session::ConversationSession;
use crate::transcript::{Transcript, DEFAULT_GREETING};

/// Reachability of the assistant service as last observed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendStatus {
    /// Not probed yet
    #[default]
    Unknown,
    /// Last probe or exchange succeeded
    Online,
    /// Last probe or exchange failed
    Offline,
}

impl BackendStatus {
    /// Label for status displays
    pub fn description(&self) -> &'static str {
        match self {
            Self::Unknown => "Connecting",
            Self::Online => "Online",
            Self::Offline => "Offline",
        }
    }
}

/// Whole interaction state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatState {
    pub(crate) transcript: Transcript,
    pub(crate) session: ConversationSession,
    pub(crate) feedback: FeedbackFlow,
    pub(crate) draft: String,
    pub(crate) backend_status: BackendStatus,
}

impl ChatState {
    /// Fresh state: seeded transcript, no conversation, survey closed
    pub fn new(greeting: impl Into<String>, thanks_delay: Duration) -> Self {
        Self {
            transcript: Transcript::new(greeting),
            session: ConversationSession::new(),
            feedback: FeedbackFlow::new(thanks_delay),
            draft: String::new(),
            backend_status: BackendStatus::Unknown,
        }
    }

    /// The transcript
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The conversation session
    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    /// The survey
    pub fn feedback(&self) -> &FeedbackFlow {
        &self.feedback
    }

    /// Current input draft
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Last observed service reachability
    pub fn backend_status(&self) -> BackendStatus {
        self.backend_status
    }

    /// Whether a chat request is in flight
    pub fn is_pending(&self) -> bool {
        self.session.is_pending()
    }

    /// Whether a submission of `text` would be accepted right now
    pub fn can_submit(&self, text: &str) -> bool {
        !text.trim().is_empty() && !self.session.is_pending() && !self.feedback.is_active()
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING, DEFAULT_THANKS_DELAY)
    }
}
