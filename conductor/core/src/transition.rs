//! Pure State Transition Function
//!
//! `transition(state, event) -> (state, effects)`. No I/O, no clock, no
//! randomness: everything observable leaves as an [`Effect`].

use crate::backend::{ChatRequest, ChatResponse, FeedbackReport};
use crate::effects::Effect;
use crate::events::Event;
use crate::feedback::{AutoCloseTicket, FeedbackReason};
use crate::messages::Message;
use crate::session::SessionEpoch;
use crate::state::{BackendStatus, ChatState};

/// Result of a state transition
#[derive(Clone, Debug)]
pub struct TransitionResult {
    /// The new state
    pub state: ChatState,
    /// Effects to execute, in order
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    /// State plus effects
    pub fn new(state: ChatState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }

    /// State with nothing to execute
    pub fn no_change(state: ChatState) -> Self {
        Self {
            state,
            effects: vec![],
        }
    }
}

/// Apply one event
pub fn transition(state: ChatState, event: Event) -> TransitionResult {
    match event {
        Event::Started => TransitionResult::new(state, vec![Effect::CheckHealth]),

        // Chat outcomes override the health check result, never the reverse
        Event::HealthChecked { online } => {
            let mut state = state;
            if state.backend_status == BackendStatus::Unknown {
                state.backend_status = if online {
                    BackendStatus::Online
                } else {
                    BackendStatus::Offline
                };
            }
            TransitionResult::no_change(state)
        }

        Event::DraftChanged { text } => {
            let mut state = state;
            if !state.feedback.is_active() {
                state.draft = text;
            }
            TransitionResult::no_change(state)
        }

        Event::Submit { text } => submit(state, text),

        Event::ChatSucceeded { epoch, response } => chat_succeeded(state, epoch, response),

        Event::ChatFailed { epoch, error } => chat_failed(state, epoch, &error),

        Event::EndChat => {
            let mut state = state;
            if state.feedback.open() {
                TransitionResult::new(state, vec![Effect::debug("Feedback survey opened")])
            } else {
                TransitionResult::no_change(state)
            }
        }

        Event::Rate { satisfied } => {
            let mut state = state;
            if !state.feedback.rate(satisfied) {
                return TransitionResult::no_change(state);
            }
            if satisfied {
                thank(state, None)
            } else {
                TransitionResult::no_change(state)
            }
        }

        Event::ChooseReason { reason } => {
            let mut state = state;
            if state.feedback.choose_reason(reason) {
                thank(state, Some(reason))
            } else {
                TransitionResult::no_change(state)
            }
        }

        Event::CloseFeedback => {
            let mut state = state;
            if state.feedback.close() {
                TransitionResult::new(
                    state,
                    vec![Effect::debug("Feedback survey abandoned")],
                )
            } else {
                TransitionResult::no_change(state)
            }
        }

        Event::AutoCloseElapsed { ticket } => auto_close(state, ticket),
    }
}

/// Accept a message, append it optimistically and issue the request
fn submit(mut state: ChatState, text: String) -> TransitionResult {
    if !state.can_submit(&text) {
        return TransitionResult::no_change(state);
    }
    if !state.session.begin_request() {
        return TransitionResult::no_change(state);
    }

    let request = ChatRequest::new(text.clone(), state.session.conversation_id().cloned());
    let epoch = state.session.epoch();

    state.transcript.append(Message::user(text));
    state.draft.clear();

    TransitionResult::new(state, vec![Effect::SendChat { epoch, request }])
}

fn chat_succeeded(
    mut state: ChatState,
    epoch: SessionEpoch,
    response: ChatResponse,
) -> TransitionResult {
    if let Some(stale) = stale_completion(&state, epoch) {
        return TransitionResult::new(state, vec![stale]);
    }

    state.session.complete(response.conversation_id);
    state
        .transcript
        .append(Message::reply(response.response, response.confidence));
    state.backend_status = BackendStatus::Online;

    TransitionResult::no_change(state)
}

fn chat_failed(mut state: ChatState, epoch: SessionEpoch, error: &str) -> TransitionResult {
    if let Some(stale) = stale_completion(&state, epoch) {
        return TransitionResult::new(state, vec![stale]);
    }

    state.session.fail();
    state.transcript.append(Message::chat_error());
    state.backend_status = BackendStatus::Offline;

    TransitionResult::new(state, vec![Effect::warn(format!("Chat request failed: {error}"))])
}

/// Completions from an earlier epoch (or with nothing in flight) are dropped
fn stale_completion(state: &ChatState, epoch: SessionEpoch) -> Option<Effect> {
    if epoch == state.session.epoch() && state.session.is_pending() {
        return None;
    }
    Some(Effect::debug(format!(
        "Ignoring chat completion from epoch {} (current epoch {})",
        epoch.0,
        state.session.epoch().0
    )))
}

/// Enter `thanks`: send the report and arm the auto-close
fn thank(mut state: ChatState, reason: Option<FeedbackReason>) -> TransitionResult {
    let report = FeedbackReport {
        satisfied: reason.is_none(),
        reason,
        query: state.transcript.last_user().map(|m| m.content.clone()),
        response: state.transcript.last_assistant().map(|m| m.content.clone()),
    };
    let ticket = state.feedback.arm_auto_close();
    let delay = state.feedback.thanks_delay();

    TransitionResult::new(
        state,
        vec![
            Effect::SendFeedback { report },
            Effect::ScheduleAutoClose { ticket, delay },
        ],
    )
}

/// Leave `thanks` and start over
fn auto_close(mut state: ChatState, ticket: AutoCloseTicket) -> TransitionResult {
    if !state.feedback.finish(ticket) {
        return TransitionResult::no_change(state);
    }

    state.transcript.reset();
    state.session.reset();
    state.draft.clear();

    TransitionResult::new(
        state,
        vec![Effect::info("Survey finished; conversation reset")],
    )
}
