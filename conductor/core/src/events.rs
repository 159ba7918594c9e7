//! Events
//!
//! Everything that can happen to the chat state: user actions forwarded by a
//! surface, completions of backend calls, and timer expiries. Events are
//! applied one at a time by [`crate::transition::transition`].

use serde::{Deserialize, Serialize};

use crate::backend::ChatResponse;
use crate::feedback::{AutoCloseTicket, FeedbackReason};
use crate::session::SessionEpoch;

/// Input to the state machine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // ============================================
    // Lifecycle
    // ============================================
    /// The surface is up; probe the service
    Started,

    // ============================================
    // User Input Events
    // ============================================
    /// The input draft changed
    DraftChanged {
        /// Full draft text
        text: String,
    },

    /// User submitted a message
    Submit {
        /// The message, verbatim
        text: String,
    },

    /// User ended the conversation
    EndChat,

    /// User answered the satisfaction question
    Rate {
        /// Whether the user was satisfied
        satisfied: bool,
    },

    /// User picked why they were not satisfied
    ChooseReason {
        /// The picked reason
        reason: FeedbackReason,
    },

    /// User dismissed the survey
    CloseFeedback,

    // ============================================
    // Backend Completion Events
    // ============================================
    /// `/chat` answered successfully
    ChatSucceeded {
        /// Session epoch the request was issued in
        epoch: SessionEpoch,
        /// Decoded reply
        response: ChatResponse,
    },

    /// `/chat` failed for any reason
    ChatFailed {
        /// Session epoch the request was issued in
        epoch: SessionEpoch,
        /// Error description (for logs)
        error: String,
    },

    /// `/health` probe finished
    HealthChecked {
        /// Whether the service answered healthy
        online: bool,
    },

    // ============================================
    // Timer Events
    // ============================================
    /// The thank-you card's display delay elapsed
    AutoCloseElapsed {
        /// Ticket the timer was scheduled with
        ticket: AutoCloseTicket,
    },
}

impl Event {
    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::DraftChanged { .. } => "draft_changed",
            Self::Submit { .. } => "submit",
            Self::EndChat => "end_chat",
            Self::Rate { .. } => "rate",
            Self::ChooseReason { .. } => "choose_reason",
            Self::CloseFeedback => "close_feedback",
            Self::ChatSucceeded { .. } => "chat_succeeded",
            Self::ChatFailed { .. } => "chat_failed",
            Self::HealthChecked { .. } => "health_checked",
            Self::AutoCloseElapsed { .. } => "auto_close_elapsed",
        }
    }
}
