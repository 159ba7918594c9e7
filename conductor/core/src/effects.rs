//! Effects (side effects as data)
//!
//! A transition never performs I/O. It returns effects describing the I/O to
//! perform, and the [`crate::Conductor`] executes them. This keeps every
//! sequencing rule testable without a network or a clock.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::{ChatRequest, FeedbackReport};
use crate::feedback::AutoCloseTicket;
use crate::session::SessionEpoch;

/// Work requested by a transition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Call `POST /chat`; completes with `ChatSucceeded` or `ChatFailed`
    SendChat {
        /// Session epoch to tag the completion with
        epoch: SessionEpoch,
        /// Request body
        request: ChatRequest,
    },

    /// Call `POST /feedback`; fire-and-forget
    SendFeedback {
        /// Request body
        report: FeedbackReport,
    },

    /// Emit `AutoCloseElapsed` after `delay`, replacing any pending timer
    ScheduleAutoClose {
        /// Ticket to echo back
        ticket: AutoCloseTicket,
        /// Display delay
        delay: Duration,
    },

    /// Probe `GET /health`; completes with `HealthChecked`
    CheckHealth,

    /// Record a diagnostic
    Log {
        /// Severity
        level: LogLevel,
        /// What happened
        message: String,
    },
}

/// Severity for [`Effect::Log`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// Routine detail
    Debug,
    /// Notable but expected
    Info,
    /// Something went wrong but was recovered
    Warn,
}

impl Effect {
    /// Debug-level log effect
    pub fn debug(message: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Debug,
            message: message.into(),
        }
    }

    /// Info-level log effect
    pub fn info(message: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Info,
            message: message.into(),
        }
    }

    /// Warn-level log effect
    pub fn warn(message: impl Into<String>) -> Self {
        Self::Log {
            level: LogLevel::Warn,
            message: message.into(),
        }
    }

    /// Whether this effect performs network I/O
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::SendChat { .. } | Self::SendFeedback { .. } | Self::CheckHealth
        )
    }
}
