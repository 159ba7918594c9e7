//! Conversation Session
//!
//! Tracks the opaque conversation identifier issued by the assistant service
//! and whether a message exchange is in flight.
//!
//! # Backpressure
//!
//! At most one chat request is outstanding. [`ConversationSession::begin_request`]
//! refuses to start a second one until the first resolves, which keeps replies
//! from interleaving.
//!
//! # Epochs
//!
//! Every [`ConversationSession::reset`] advances the session epoch. Chat
//! requests carry the epoch they were issued in so that a completion arriving
//! after a reset can be recognised as stale.

use serde::{Deserialize, Serialize};

/// Opaque conversation identifier issued by the assistant service
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub String);

impl ConversationId {
    /// Wrap a service-issued identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session generation counter, advanced on every reset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionEpoch(pub u64);

impl SessionEpoch {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Conversation session state
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConversationSession {
    conversation_id: Option<ConversationId>,
    pending: bool,
    epoch: SessionEpoch,
}

impl ConversationSession {
    /// Create an idle session with no conversation identifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier to echo on the next request (`None` before the first success)
    pub fn conversation_id(&self) -> Option<&ConversationId> {
        self.conversation_id.as_ref()
    }

    /// Whether a chat request is in flight
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Current session epoch
    pub fn epoch(&self) -> SessionEpoch {
        self.epoch
    }

    /// Mark a request as in flight
    ///
    /// Returns `false` (and changes nothing) if one is already outstanding.
    pub fn begin_request(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Record a successful exchange
    ///
    /// The service is the authority on continuity, so the returned identifier
    /// always replaces the previous one.
    pub fn complete(&mut self, conversation_id: ConversationId) {
        self.conversation_id = Some(conversation_id);
        self.pending = false;
    }

    /// Record a failed exchange; the identifier is left untouched
    pub fn fail(&mut self) {
        self.pending = false;
    }

    /// Forget the conversation and start a new epoch
    pub fn reset(&mut self) {
        self.conversation_id = None;
        self.pending = false;
        self.epoch = self.epoch.next();
    }
}
