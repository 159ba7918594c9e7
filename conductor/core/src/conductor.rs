//! Conductor - The Effect Interpreter
//!
//! The Conductor owns the [`ChatState`] and is the only place where events are
//! applied. It feeds each event through [`transition`] and then executes the
//! returned effects:
//! - network calls run as spawned tasks whose only output is a completion
//!   event sent back over an mpsc channel
//! - the thank-you auto-close is a single abortable timer task
//! - log effects go to `tracing`
//!
//! # Design Philosophy
//!
//! The Conductor is UI-agnostic. A surface forwards user input as [`Event`]s,
//! pulls completions with [`Conductor::recv_completion`] or [`Conductor::poll`],
//! and renders from [`Conductor::state`]. Events are applied one at a time, so
//! the state never sees concurrent mutation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::backend::{AssistantBackend, ChatRequest, FeedbackReport};
use crate::config::CabinConfig;
use crate::effects::{Effect, LogLevel};
use crate::events::Event;
use crate::feedback::{AutoCloseTicket, FeedbackReason, DEFAULT_THANKS_DELAY};
use crate::session::SessionEpoch;
use crate::state::ChatState;
use crate::transcript::DEFAULT_GREETING;
use crate::transition::{transition, TransitionResult};

/// Conductor configuration
#[derive(Clone, Debug)]
pub struct ConductorConfig {
    /// Greeting seeded into every fresh transcript
    pub greeting: String,
    /// How long the thank-you card stays up
    pub thanks_delay: Duration,
    /// Whether [`Conductor::start`] probes the service
    pub health_check_on_start: bool,
}

impl Default for ConductorConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            thanks_delay: DEFAULT_THANKS_DELAY,
            health_check_on_start: true,
        }
    }
}

impl From<&CabinConfig> for ConductorConfig {
    fn from(config: &CabinConfig) -> Self {
        Self {
            greeting: config.greeting.clone(),
            thanks_delay: config.thanks_delay,
            health_check_on_start: config.health_check_on_start,
        }
    }
}

/// The Conductor - headless driver of the chat state machine
pub struct Conductor<B: AssistantBackend> {
    /// Configuration
    config: ConductorConfig,
    /// Assistant service
    backend: Arc<B>,
    /// Current state
    state: ChatState,
    /// Completion events from spawned tasks
    completion_tx: mpsc::UnboundedSender<Event>,
    completion_rx: mpsc::UnboundedReceiver<Event>,
    /// The pending `thanks → closed` timer, if any
    auto_close: Option<JoinHandle<()>>,
}

impl<B: AssistantBackend + 'static> Conductor<B> {
    /// Create a new Conductor with the given backend
    pub fn new(backend: B, config: ConductorConfig) -> Self {
        Self::with_shared_backend(Arc::new(backend), config)
    }

    /// Create a Conductor around a backend the caller keeps a handle to
    pub fn with_shared_backend(backend: Arc<B>, config: ConductorConfig) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let state = ChatState::new(config.greeting.clone(), config.thanks_delay);

        tracing::debug!(backend = backend.name(), "Conductor created");

        Self {
            config,
            backend,
            state,
            completion_tx,
            completion_rx,
            auto_close: None,
        }
    }

    /// Current state
    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// Configuration
    pub fn config(&self) -> &ConductorConfig {
        &self.config
    }

    /// The assistant service
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether an auto-close timer is armed and has not fired yet
    pub fn auto_close_armed(&self) -> bool {
        self.auto_close
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Announce the surface is up (probes `/health` if configured)
    pub fn start(&mut self) {
        tracing::info!(backend = self.backend.name(), "Conductor starting");
        if self.config.health_check_on_start {
            self.handle_event(Event::Started);
        }
    }

    /// Apply one event and execute its effects
    pub fn handle_event(&mut self, event: Event) {
        let kind = event.kind();
        let state = std::mem::take(&mut self.state);
        let TransitionResult { state, effects } = transition(state, event);
        self.state = state;

        tracing::trace!(event = kind, effects = effects.len(), "Applied event");

        for effect in effects {
            self.execute(effect);
        }
    }

    /// Apply every completion that is already waiting
    ///
    /// Returns how many were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.completion_rx.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion without applying it
    ///
    /// Cancel-safe; intended for `tokio::select!` loops that then pass the
    /// event to [`Conductor::handle_event`].
    pub async fn recv_completion(&mut self) -> Option<Event> {
        self.completion_rx.recv().await
    }

    /// Wait for the next completion and apply it
    pub async fn process_next(&mut self) -> bool {
        match self.completion_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    // ============================================
    // User actions
    // ============================================

    /// Submit a message
    pub fn submit(&mut self, text: impl Into<String>) {
        self.handle_event(Event::Submit { text: text.into() });
    }

    /// Replace the input draft
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.handle_event(Event::DraftChanged { text: text.into() });
    }

    /// End the conversation and open the survey
    pub fn end_chat(&mut self) {
        self.handle_event(Event::EndChat);
    }

    /// Answer the satisfaction question
    pub fn rate(&mut self, satisfied: bool) {
        self.handle_event(Event::Rate { satisfied });
    }

    /// Pick why the user was not satisfied
    pub fn choose_reason(&mut self, reason: FeedbackReason) {
        self.handle_event(Event::ChooseReason { reason });
    }

    /// Dismiss the survey
    pub fn close_feedback(&mut self) {
        self.handle_event(Event::CloseFeedback);
    }

    // ============================================
    // Effect execution
    // ============================================

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::SendChat { epoch, request } => self.spawn_chat(epoch, request),
            Effect::SendFeedback { report } => self.spawn_feedback(report),
            Effect::ScheduleAutoClose { ticket, delay } => self.schedule_auto_close(ticket, delay),
            Effect::CheckHealth => self.spawn_health_check(),
            Effect::Log { level, message } => match level {
                LogLevel::Debug => tracing::debug!("{}", message),
                LogLevel::Info => tracing::info!("{}", message),
                LogLevel::Warn => tracing::warn!("{}", message),
            },
        }
    }

    fn spawn_chat(&self, epoch: SessionEpoch, request: ChatRequest) {
        tracing::debug!(
            epoch = epoch.0,
            conversation_id = request.conversation_id.as_ref().map(|id| id.as_str()),
            "Sending chat request"
        );

        let backend = Arc::clone(&self.backend);
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let event = match backend.chat(&request).await {
                Ok(response) => Event::ChatSucceeded { epoch, response },
                Err(e) => Event::ChatFailed {
                    epoch,
                    error: e.to_string(),
                },
            };
            if tx.send(event).is_err() {
                tracing::debug!("Conductor gone before chat completion");
            }
        });
    }

    fn spawn_feedback(&self, report: FeedbackReport) {
        tracing::info!(
            satisfied = report.satisfied,
            reason = report.reason.map(|r| r.label()),
            "Submitting feedback"
        );

        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            if let Err(e) = backend.submit_feedback(&report).await {
                tracing::warn!(error = %e, "Feedback submission failed");
            }
        });
    }

    fn spawn_health_check(&self) {
        let backend = Arc::clone(&self.backend);
        let tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let online = backend.health_check().await;
            tracing::info!(online, "Health check finished");
            if tx.send(Event::HealthChecked { online }).is_err() {
                tracing::debug!("Conductor gone before health check completion");
            }
        });
    }

    /// Replace any pending timer with one for `ticket`
    fn schedule_auto_close(&mut self, ticket: AutoCloseTicket, delay: Duration) {
        if let Some(previous) = self.auto_close.take() {
            previous.abort();
        }

        let tx = self.completion_tx.clone();
        self.auto_close = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(Event::AutoCloseElapsed { ticket }).is_err() {
                tracing::debug!(ticket = ticket.0, "Conductor gone before auto-close");
            }
        }));
    }
}

impl<B: AssistantBackend> Drop for Conductor<B> {
    fn drop(&mut self) {
        if let Some(handle) = self.auto_close.take() {
            handle.abort();
        }
    }
}
