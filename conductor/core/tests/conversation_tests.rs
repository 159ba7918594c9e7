//! End-to-end conversation and survey scenarios
//!
//! Drives a real [`Conductor`] against a scripted in-memory backend. Tests
//! cover:
//! - a successful exchange carrying a confidence score
//! - submissions rejected while a request is in flight
//! - recovery from a failed exchange
//! - the full "not satisfied" survey path and the reset that ends it
//! - replies that arrive after the conversation was reset

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::sync::Notify;

use cabin_core::{
    AssistantBackend, BackendError, BackendStatus, ChatRequest, ChatResponse, Conductor,
    ConductorConfig, ConversationId, FeedbackReason, FeedbackReport, FeedbackStep, MessageRole,
    CHAT_ERROR_MESSAGE,
};

// =============================================================================
// Scripted backend
// =============================================================================

type ChatResult = Result<ChatResponse, BackendError>;

/// Backend that answers `/chat` from a script and records every call
#[derive(Default)]
struct ScriptedBackend {
    healthy: bool,
    replies: Mutex<VecDeque<ChatResult>>,
    /// When set, each chat waits for one notification before answering
    gate: Option<Arc<Notify>>,
    fail_feedback: bool,
    chats: Mutex<Vec<ChatRequest>>,
    reports: Mutex<Vec<FeedbackReport>>,
}

impl ScriptedBackend {
    fn replying(replies: Vec<ChatResult>) -> Self {
        Self {
            healthy: true,
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn chats(&self) -> Vec<ChatRequest> {
        self.chats.lock().unwrap().clone()
    }

    fn reports(&self) -> Vec<FeedbackReport> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssistantBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    async fn chat(&self, request: &ChatRequest) -> ChatResult {
        self.chats.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::MalformedResponse("script exhausted".into())))
    }

    async fn submit_feedback(&self, report: &FeedbackReport) -> Result<(), BackendError> {
        self.reports.lock().unwrap().push(report.clone());
        if self.fail_feedback {
            return Err(BackendError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}

fn reply(text: &str, id: &str, confidence: Option<f64>) -> ChatResult {
    Ok(ChatResponse {
        response: text.to_string(),
        conversation_id: ConversationId::new(id),
        confidence,
    })
}

fn quick_config() -> ConductorConfig {
    ConductorConfig {
        greeting: "Welcome aboard!".to_string(),
        thanks_delay: Duration::from_millis(20),
        health_check_on_start: true,
    }
}

fn conductor_with(backend: ScriptedBackend) -> (Conductor<ScriptedBackend>, Arc<ScriptedBackend>) {
    let backend = Arc::new(backend);
    let conductor = Conductor::with_shared_backend(Arc::clone(&backend), quick_config());
    (conductor, backend)
}

// =============================================================================
// Conversation scenarios
// =============================================================================

#[tokio::test]
async fn test_baggage_question_gets_answer_with_confidence() {
    let (mut conductor, backend) = conductor_with(ScriptedBackend::replying(vec![
        reply("23kg per bag", "abc123", Some(0.9)),
        reply("Yes, one carry-on", "abc123", None),
    ]));

    conductor.submit("What is the baggage allowance?");
    assert!(conductor.process_next().await);

    let state = conductor.state();
    let messages = state.transcript().messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, MessageRole::User);
    assert_eq!(messages[1].content, "What is the baggage allowance?");
    assert_eq!(messages[2].role, MessageRole::Assistant);
    assert_eq!(messages[2].content, "23kg per bag");
    assert_eq!(messages[2].confidence, Some(0.9));
    assert_eq!(messages[2].confidence_percent(), Some(90));
    assert_eq!(
        state.session().conversation_id(),
        Some(&ConversationId::new("abc123"))
    );
    assert!(!state.is_pending());

    conductor.submit("And carry-on?");
    assert!(conductor.process_next().await);

    let chats = backend.chats();
    assert_eq!(chats.len(), 2);
    assert_eq!(chats[0].conversation_id, None);
    assert_eq!(chats[1].conversation_id, Some(ConversationId::new("abc123")));
}

#[tokio::test]
async fn test_submit_while_pending_is_ignored() {
    let gate = Arc::new(Notify::new());
    let (mut conductor, backend) = conductor_with(
        ScriptedBackend::replying(vec![reply("first answer", "c1", None)]).gated(Arc::clone(&gate)),
    );

    conductor.submit("first");
    assert!(conductor.state().is_pending());

    conductor.submit("second");
    assert_eq!(conductor.state().transcript().len(), 2);

    gate.notify_one();
    assert!(conductor.process_next().await);

    assert_eq!(backend.chats().len(), 1);
    let messages = conductor.state().transcript().messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].content, "first answer");
}

#[tokio::test]
async fn test_failed_exchange_appends_single_apology() {
    let (mut conductor, _backend) = conductor_with(ScriptedBackend::replying(vec![Err(
        BackendError::Status {
            status: 500,
            body: "internal error".to_string(),
        },
    )]));

    conductor.submit("Is my flight on time?");
    assert!(conductor.process_next().await);

    let state = conductor.state();
    assert!(!state.is_pending());
    assert_eq!(state.backend_status(), BackendStatus::Offline);

    let errors: Vec<_> = state
        .transcript()
        .messages()
        .iter()
        .filter(|m| m.error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].role, MessageRole::Assistant);
    assert_eq!(errors[0].content, CHAT_ERROR_MESSAGE);
    assert!(state.session().conversation_id().is_none());
}

#[tokio::test]
async fn test_health_probe_marks_backend_offline() {
    let (mut conductor, _backend) = conductor_with(ScriptedBackend::default());

    conductor.start();
    assert!(conductor.process_next().await);

    assert_eq!(conductor.state().backend_status(), BackendStatus::Offline);
}

// =============================================================================
// Survey scenarios
// =============================================================================

#[tokio::test]
async fn test_slow_response_feedback_then_reset() {
    let (mut conductor, backend) = conductor_with(ScriptedBackend::replying(vec![reply(
        "23kg per bag",
        "abc123",
        Some(0.9),
    )]));

    conductor.submit("What is the baggage allowance?");
    assert!(conductor.process_next().await);

    conductor.end_chat();
    assert_eq!(conductor.state().feedback().step(), FeedbackStep::Rating);

    conductor.rate(false);
    assert_eq!(conductor.state().feedback().step(), FeedbackStep::Reason);
    assert!(backend.reports().is_empty());

    conductor.choose_reason(FeedbackReason::SlowResponse);
    assert_eq!(conductor.state().feedback().step(), FeedbackStep::Thanks);

    // Next completion is the auto-close timer
    assert!(conductor.process_next().await);

    assert_eq!(
        backend.reports(),
        vec![FeedbackReport {
            satisfied: false,
            reason: Some(FeedbackReason::SlowResponse),
            query: Some("What is the baggage allowance?".to_string()),
            response: Some("23kg per bag".to_string()),
        }]
    );

    let state = conductor.state();
    assert_eq!(state.feedback().step(), FeedbackStep::Closed);
    assert_eq!(state.transcript().len(), 1);
    assert_eq!(state.transcript().messages()[0].content, "Welcome aboard!");
    assert!(state.session().conversation_id().is_none());
}

#[tokio::test]
async fn test_feedback_failure_does_not_block_thanks() {
    let backend = ScriptedBackend {
        fail_feedback: true,
        ..ScriptedBackend::replying(vec![])
    };
    let (mut conductor, backend) = conductor_with(backend);

    conductor.end_chat();
    conductor.rate(true);
    assert_eq!(conductor.state().feedback().step(), FeedbackStep::Thanks);

    assert!(conductor.process_next().await);
    assert_eq!(conductor.state().feedback().step(), FeedbackStep::Closed);
    assert_eq!(backend.reports().len(), 1);
    assert!(backend.reports()[0].satisfied);
}

#[tokio::test]
async fn test_closing_survey_keeps_conversation() {
    let (mut conductor, backend) =
        conductor_with(ScriptedBackend::replying(vec![reply("Gate B12", "c9", None)]));

    conductor.submit("Which gate?");
    assert!(conductor.process_next().await);

    conductor.end_chat();
    conductor.close_feedback();

    assert_eq!(conductor.state().feedback().step(), FeedbackStep::Closed);
    assert_eq!(conductor.state().transcript().len(), 3);
    assert_eq!(
        conductor.state().session().conversation_id(),
        Some(&ConversationId::new("c9"))
    );
    assert!(!conductor.auto_close_armed());
    assert!(backend.reports().is_empty());
}

#[tokio::test]
async fn test_reply_after_reset_is_ignored() {
    let gate = Arc::new(Notify::new());
    let (mut conductor, _backend) = conductor_with(
        ScriptedBackend::replying(vec![reply("too late", "old-conv", None)])
            .gated(Arc::clone(&gate)),
    );

    conductor.submit("slow question");
    conductor.end_chat();
    conductor.rate(true);

    // Timer fires while the chat request is still held back
    assert!(conductor.process_next().await);
    assert!(conductor.state().transcript().is_pristine());

    gate.notify_one();
    assert!(conductor.process_next().await);

    let state = conductor.state();
    assert!(state.transcript().is_pristine());
    assert!(state.session().conversation_id().is_none());
    assert!(!state.is_pending());
}
