//! Theme and Colors
//!
//! The cabin palette: navy chrome, sky-blue assistant text, green for the
//! user, and warm accents for status and the survey card.

use ratatui::style::{Color, Modifier, Style};

use cabin_core::BackendStatus;

use crate::display::{DisplayRole, LineKind};

// ============================================================================
// Cabin Palette
// ============================================================================

/// Header and overlay background - deep navy
pub const CABIN_NAVY: Color = Color::Rgb(18, 32, 64);

/// Assistant text - sky blue
pub const ASSISTANT_BLUE: Color = Color::Rgb(120, 180, 255);

/// User input green
pub const USER_GREEN: Color = Color::Rgb(130, 220, 130);

/// Headings, highlights - warm gold
pub const ACCENT_GOLD: Color = Color::Rgb(255, 200, 90);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Overlay text
pub const OVERLAY_TEXT: Color = Color::Rgb(230, 235, 245);

// ============================================================================
// Styles
// ============================================================================

/// Style for a conversation row
pub fn line_style(kind: LineKind) -> Style {
    match kind {
        LineKind::Heading(DisplayRole::User) => {
            Style::default().fg(USER_GREEN).add_modifier(Modifier::BOLD)
        }
        LineKind::Heading(DisplayRole::Assistant) => Style::default()
            .fg(ASSISTANT_BLUE)
            .add_modifier(Modifier::BOLD),
        LineKind::Body(DisplayRole::User) => Style::default().fg(USER_GREEN),
        LineKind::Body(DisplayRole::Assistant) => Style::default().fg(ASSISTANT_BLUE),
        LineKind::Error => Style::default().fg(ERROR_RED),
        LineKind::Confidence => Style::default().fg(DIM_GRAY),
        LineKind::Typing => Style::default()
            .fg(DIM_GRAY)
            .add_modifier(Modifier::ITALIC),
        LineKind::Blank => Style::default(),
    }
}

/// Style for the header status indicator
pub fn status_style(status: BackendStatus) -> Style {
    let fg = match status {
        BackendStatus::Online => SUCCESS_GREEN,
        BackendStatus::Offline => ERROR_RED,
        BackendStatus::Unknown => ACCENT_GOLD,
    };
    Style::default().fg(fg).bg(CABIN_NAVY)
}

/// Header bar
pub fn header_style() -> Style {
    Style::default()
        .fg(OVERLAY_TEXT)
        .bg(CABIN_NAVY)
        .add_modifier(Modifier::BOLD)
}

/// Survey card body
pub fn overlay_style() -> Style {
    Style::default().fg(OVERLAY_TEXT).bg(CABIN_NAVY)
}

/// Survey card title
pub fn overlay_title_style() -> Style {
    overlay_style().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD)
}
