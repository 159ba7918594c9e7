//! Key Bindings
//!
//! Translates terminal key presses into [`Action`]s. Which keys mean what
//! depends on whether the feedback overlay is up, so the mapping reads the
//! current [`ChatState`] but never changes it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use cabin_core::{ChatState, FeedbackReason, FeedbackStep};

/// What a key press asks for
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Leave the app
    Quit,
    /// Replace the input draft
    Edit(String),
    /// Send the draft
    Submit(String),
    /// Open the survey
    EndChat,
    /// Answer the satisfaction question
    Rate(bool),
    /// Pick a reason
    ChooseReason(FeedbackReason),
    /// Dismiss the survey
    CloseFeedback,
    /// Scroll the conversation back (toward older messages)
    ScrollUp,
    /// Scroll the conversation forward
    ScrollDown,
}

/// Map a key press to an action, if it has one right now
pub fn map_key(key: KeyEvent, state: &ChatState) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match state.feedback().step() {
        FeedbackStep::Closed => map_chat_key(key, ctrl, state.draft()),
        FeedbackStep::Rating => match key.code {
            KeyCode::Char('1' | 'y' | 'Y') => Some(Action::Rate(true)),
            KeyCode::Char('2' | 'n' | 'N') => Some(Action::Rate(false)),
            KeyCode::Esc => Some(Action::CloseFeedback),
            _ => None,
        },
        FeedbackStep::Reason => match key.code {
            KeyCode::Char(c) => c
                .to_digit(10)
                .and_then(|d| FeedbackReason::from_menu_index(d as usize))
                .map(Action::ChooseReason),
            KeyCode::Esc => Some(Action::CloseFeedback),
            _ => None,
        },
        // The card closes itself
        FeedbackStep::Thanks => None,
    }
}

fn map_chat_key(key: KeyEvent, ctrl: bool, draft: &str) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('e') if ctrl => Some(Action::EndChat),
        KeyCode::Enter if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            Some(Action::Edit(format!("{draft}\n")))
        }
        KeyCode::Enter => Some(Action::Submit(draft.to_string())),
        KeyCode::Char(c) if !ctrl => {
            let mut next = draft.to_string();
            next.push(c);
            Some(Action::Edit(next))
        }
        KeyCode::Backspace => {
            let mut next = draft.to_string();
            next.pop()?;
            Some(Action::Edit(next))
        }
        KeyCode::PageUp => Some(Action::ScrollUp),
        KeyCode::PageDown => Some(Action::ScrollDown),
        _ => None,
    }
}
