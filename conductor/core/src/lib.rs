//! Cabin Core - Headless Conversation Engine for cabin-assist
//!
//! This crate provides the chat and feedback state machine behind
//! cabin-assist, completely independent of any UI framework. It can drive the
//! terminal surface, or run headless for testing and automation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          UI Surface                               │
//! │   key press ──► Event                    ChatState ──► render     │
//! └───────┬────────────────────────────────────────▲─────────────────┘
//!         │                                        │
//! ┌───────▼────────────────────────────────────────┴─────────────────┐
//! │                        CABIN CORE                                 │
//! │  ┌──────────────────────────────────────────────────────────────┐ │
//! │  │ Conductor (interpreter)                                       │ │
//! │  │   transition(state, event) ──► (state, effects)               │ │
//! │  │        │                              │                       │ │
//! │  │  ┌─────▼──────┐ ┌──────────┐ ┌────────▼─────┐ ┌─────────────┐ │ │
//! │  │  │ Transcript │ │ Session  │ │ FeedbackFlow │ │  Backend    │ │ │
//! │  │  │   Store    │ │          │ │              │ │  (HTTP)     │ │ │
//! │  │  └────────────┘ └──────────┘ └──────────────┘ └─────────────┘ │ │
//! │  └──────────────────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Conductor`]: Owns the state, applies events, executes effects
//! - [`ChatState`]: Transcript, session, survey, draft and service status
//! - [`Event`]: User actions, backend completions and timer expiries
//! - [`Effect`]: I/O requested by a transition
//! - [`AssistantBackend`]: The remote assistant service
//!
//! # Quick Start
//!
//! ```ignore
//! use cabin_core::{load_config, Conductor, ConductorConfig, HttpBackend};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let backend = HttpBackend::new(config.backend())?;
//!     let mut conductor = Conductor::new(backend, ConductorConfig::from(&config));
//!
//!     conductor.start();
//!     conductor.submit("What is the baggage allowance?");
//!
//!     while conductor.state().is_pending() {
//!         conductor.process_next().await;
//!     }
//!     for message in conductor.state().transcript().messages() {
//!         println!("{:?}: {}", message.role, message.content);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`backend`]: Assistant service abstraction and HTTP client
//! - [`config`]: Layered TOML / environment / CLI configuration
//! - [`conductor`]: The effect interpreter
//! - [`effects`]: Side effects as data
//! - [`events`]: Inputs to the state machine
//! - [`feedback`]: Satisfaction survey steps and reasons
//! - [`messages`]: Chat messages
//! - [`session`]: Conversation identifier and in-flight status
//! - [`state`]: The whole interaction state
//! - [`transcript`]: Append-only message log
//! - [`transition`]: The pure transition function
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework. It's pure business logic that can be used anywhere.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod conductor;
pub mod config;
pub mod effects;
pub mod events;
pub mod feedback;
pub mod messages;
pub mod session;
pub mod state;
pub mod transcript;
pub mod transition;

// Re-exports for convenience
pub use backend::{
    AssistantBackend, BackendConfig, BackendError, ChatRequest, ChatResponse, FeedbackReport,
    HttpBackend,
};
pub use conductor::{Conductor, ConductorConfig};
pub use effects::{Effect, LogLevel};
pub use events::Event;
pub use feedback::{AutoCloseTicket, FeedbackFlow, FeedbackReason, FeedbackStep};
pub use messages::{Message, MessageId, MessageRole, CHAT_ERROR_MESSAGE};
pub use session::{ConversationId, ConversationSession, SessionEpoch};
pub use state::{BackendStatus, ChatState};
pub use transcript::{Transcript, DEFAULT_GREETING};
pub use transition::{transition, TransitionResult};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, CabinConfig, CabinToml, ConfigError,
    ConfigOverrides, ConfigSource,
};
