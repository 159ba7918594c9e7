//! Transcript Store
//!
//! The ordered, append-only log of chat messages. Everything a surface shows
//! about the conversation is derived from it.
//!
//! There are no delete or reorder operations: the only way to
//! drop history is [`Transcript::reset`], which reseeds the greeting.

use serde::{Deserialize, Serialize};

use crate::messages::{Message, MessageRole};

/// Greeting seeded into every fresh transcript
pub const DEFAULT_GREETING: &str =
    "Hello! I'm your airline assistant. How can I help you today?";

/// Ordered log of chat messages
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
    greeting: String,
}

impl Transcript {
    /// Create a transcript seeded with one assistant greeting
    pub fn new(greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        Self {
            messages: vec![Message::assistant(greeting.clone())],
            greeting,
        }
    }

    /// Append a message to the end
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replace the whole sequence with a freshly seeded greeting
    pub fn reset(&mut self) {
        self.messages = vec![Message::assistant(self.greeting.clone())];
    }

    /// All messages in chronological order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript is empty (never true after construction)
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Last message satisfying the role predicate, scanning from the end
    pub fn last_of_role(&self, role: MessageRole) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == role)
    }

    /// Last message typed by the user
    pub fn last_user(&self) -> Option<&Message> {
        self.last_of_role(MessageRole::User)
    }

    /// Last assistant message (including synthesized failures)
    pub fn last_assistant(&self) -> Option<&Message> {
        self.last_of_role(MessageRole::Assistant)
    }

    /// Whether this is an untouched, freshly seeded transcript
    pub fn is_pristine(&self) -> bool {
        matches!(
            self.messages.as_slice(),
            [only] if only.role == MessageRole::Assistant && only.content == self.greeting
        )
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transcript_is_seeded() {
        let transcript = Transcript::default();
        assert_eq!(transcript.len(), 1);
        assert!(transcript.is_pristine());

        let greeting = &transcript.messages()[0];
        assert_eq!(greeting.role, MessageRole::Assistant);
        assert_eq!(greeting.content, DEFAULT_GREETING);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut transcript = Transcript::new("Hi");
        transcript.append(Message::user("first"));
        transcript.append(Message::assistant("second"));
        transcript.append(Message::user("third"));

        let contents: Vec<_> = transcript
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["Hi", "first", "second", "third"]);
        assert!(!transcript.is_pristine());
    }

    #[test]
    fn test_append_does_not_touch_prior_entries() {
        let mut transcript = Transcript::new("Hi");
        transcript.append(Message::user("question"));
        let before = transcript.messages()[1].clone();

        transcript.append(Message::assistant("answer"));
        assert_eq!(transcript.messages()[1], before);
    }

    #[test]
    fn test_last_of_role_scans_from_end() {
        let mut transcript = Transcript::new("Hi");
        transcript.append(Message::user("q1"));
        transcript.append(Message::assistant("a1"));
        transcript.append(Message::user("q2"));

        assert_eq!(transcript.last_user().map(|m| m.content.as_str()), Some("q2"));
        assert_eq!(
            transcript.last_assistant().map(|m| m.content.as_str()),
            Some("a1")
        );
    }

    #[test]
    fn test_last_user_absent_on_fresh_transcript() {
        let transcript = Transcript::new("Hi");
        assert!(transcript.last_user().is_none());
        assert_eq!(
            transcript.last_assistant().map(|m| m.content.as_str()),
            Some("Hi")
        );
    }

    #[test]
    fn test_last_assistant_includes_error_messages() {
        let mut transcript = Transcript::new("Hi");
        transcript.append(Message::user("q"));
        transcript.append(Message::chat_error());

        assert!(transcript.last_assistant().is_some_and(|m| m.error));
    }

    #[test]
    fn test_reset_reseeds_greeting() {
        let mut transcript = Transcript::new("Welcome aboard");
        transcript.append(Message::user("q"));
        transcript.append(Message::assistant("a"));

        transcript.reset();
        assert_eq!(transcript.len(), 1);
        assert!(transcript.is_pristine());
        assert_eq!(transcript.messages()[0].content, "Welcome aboard");
    }
}
