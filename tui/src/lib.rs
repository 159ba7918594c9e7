//! Cabin TUI - Terminal interface for cabin-assist
//!
//! This crate provides a full-screen terminal chat with the airline
//! assistant, plus the post-conversation satisfaction survey.
//!
//! # Architecture
//!
//! - **Compositor**: Layered rendering with z-ordering for the survey overlay
//! - **Display**: Per-frame view model derived from the core state
//! - **Input**: Key bindings mapped to core events
//! - **Widgets**: Borderless scrollable text blocks

pub mod app;
pub mod compositor;
pub mod display;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::App;
