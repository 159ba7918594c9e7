//! Wire Types
//!
//! JSON bodies exchanged with the assistant service.

use serde::{Deserialize, Serialize};

use crate::feedback::FeedbackReason;
use crate::session::ConversationId;

/// Body of `POST /chat`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message, verbatim
    pub message: String,
    /// Identifier from the previous reply, `null` on the first turn
    pub conversation_id: Option<ConversationId>,
}

impl ChatRequest {
    /// Build a request
    pub fn new(message: impl Into<String>, conversation_id: Option<ConversationId>) -> Self {
        Self {
            message: message.into(),
            conversation_id,
        }
    }
}

/// Successful body of `POST /chat`
///
/// Unknown fields (the service also returns `sources`) are ignored; a body
/// missing `response` or `conversation_id` fails to decode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Assistant reply text
    pub response: String,
    /// Identifier to echo on the next request
    pub conversation_id: ConversationId,
    /// Optional confidence score in `[0, 1]`
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Body of `POST /feedback`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    /// Whether the user was satisfied
    pub satisfied: bool,
    /// Why not, when `satisfied` is false
    pub reason: Option<FeedbackReason>,
    /// Content of the last user message
    pub query: Option<String>,
    /// Content of the last assistant message
    pub response: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_first_turn_sends_null_conversation_id() {
        let body = serde_json::to_value(ChatRequest::new("hello", None)).unwrap();
        assert_eq!(body, json!({"message": "hello", "conversation_id": null}));
    }

    #[test]
    fn test_follow_up_echoes_conversation_id() {
        let request = ChatRequest::new("and liquids?", Some(ConversationId::new("abc123")));
        let body = serde_json::to_value(request).unwrap();
        assert_eq!(
            body,
            json!({"message": "and liquids?", "conversation_id": "abc123"})
        );
    }

    #[test]
    fn test_response_ignores_sources_and_defaults_confidence() {
        let body = r#"{"response": "23kg per bag", "conversation_id": "abc123", "sources": [{"doc": 1}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.response, "23kg per bag");
        assert_eq!(parsed.conversation_id, ConversationId::new("abc123"));
        assert_eq!(parsed.confidence, None);
    }

    #[test]
    fn test_response_missing_conversation_id_is_rejected() {
        let body = r#"{"response": "23kg per bag"}"#;
        assert!(serde_json::from_str::<ChatResponse>(body).is_err());
    }

    #[test]
    fn test_unsatisfied_report_shape() {
        let report = FeedbackReport {
            satisfied: false,
            reason: Some(FeedbackReason::SlowResponse),
            query: Some("What is the baggage allowance?".to_string()),
            response: Some("23kg per bag".to_string()),
        };
        assert_eq!(
            serde_json::to_value(report).unwrap(),
            json!({
                "satisfied": false,
                "reason": "Slow Response",
                "query": "What is the baggage allowance?",
                "response": "23kg per bag"
            })
        );
    }

    #[test]
    fn test_satisfied_report_sends_null_reason() {
        let report = FeedbackReport {
            satisfied: true,
            reason: None,
            query: None,
            response: Some("Hello".to_string()),
        };
        assert_eq!(
            serde_json::to_value(report).unwrap(),
            json!({"satisfied": true, "reason": null, "query": null, "response": "Hello"})
        );
    }
}
