//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from [`ChatState`] and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it renders whatever the core state says.
//! Display state is rebuilt from [`ChatState`] every frame, so it never
//! drifts from the transcript.
//!
//! - [`DisplayMessage`]: A rendered conversation message
//! - [`SurveyView`]: What the feedback overlay shows
//! - [`DisplayState`]: Everything one frame needs

use cabin_core::{BackendStatus, ChatState, FeedbackReason, FeedbackStep, Message, MessageId, MessageRole};

/// Placeholder shown while a reply is on its way
pub const TYPING_INDICATOR: &str = "typing...";

/// Display name of the assistant
pub const ASSISTANT_NAME: &str = "Assistant";

/// A rendered conversation message
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayMessage {
    /// Unique message ID
    pub id: MessageId,
    /// Who sent this message
    pub role: DisplayRole,
    /// The message content
    pub content: String,
    /// `HH:MM` creation time
    pub timestamp: String,
    /// `Confidence: NN%`, when the reply carried a score
    pub confidence_label: Option<String>,
    /// Whether this is a locally synthesized failure
    pub error: bool,
}

impl From<&Message> for DisplayMessage {
    fn from(msg: &Message) -> Self {
        Self {
            id: msg.id.clone(),
            role: msg.role.into(),
            content: msg.content.clone(),
            timestamp: msg.timestamp.clone(),
            confidence_label: msg
                .confidence_percent()
                .map(|pct| format!("Confidence: {pct}%")),
            error: msg.error,
        }
    }
}

impl DisplayMessage {
    /// Heading line: `You · 14:05`
    pub fn heading(&self) -> String {
        format!("{} · {}", self.role.label(), self.timestamp)
    }
}

/// Display role for messages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayRole {
    /// User input
    User,
    /// The airline assistant
    Assistant,
}

impl From<MessageRole> for DisplayRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => DisplayRole::User,
            MessageRole::Assistant => DisplayRole::Assistant,
        }
    }
}

impl DisplayRole {
    /// Name shown above the message
    pub fn label(&self) -> &'static str {
        match self {
            DisplayRole::User => "You",
            DisplayRole::Assistant => ASSISTANT_NAME,
        }
    }
}

/// What the feedback overlay shows
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurveyView {
    /// No overlay
    Hidden,
    /// "Were you satisfied?"
    Rating,
    /// Numbered reason menu
    Reason {
        /// `(menu number, label)` pairs
        options: Vec<(usize, &'static str)>,
    },
    /// Thank-you card
    Thanks,
}

impl SurveyView {
    fn from_step(step: FeedbackStep) -> Self {
        match step {
            FeedbackStep::Closed => SurveyView::Hidden,
            FeedbackStep::Rating => SurveyView::Rating,
            FeedbackStep::Reason => SurveyView::Reason {
                options: FeedbackReason::ALL
                    .iter()
                    .enumerate()
                    .map(|(i, reason)| (i + 1, reason.label()))
                    .collect(),
            },
            FeedbackStep::Thanks => SurveyView::Thanks,
        }
    }

    /// Whether the overlay is drawn
    pub fn is_visible(&self) -> bool {
        !matches!(self, SurveyView::Hidden)
    }

    /// Title line
    pub fn title(&self) -> &'static str {
        match self {
            SurveyView::Hidden => "",
            SurveyView::Rating => "How was your experience?",
            SurveyView::Reason { .. } => "What went wrong?",
            SurveyView::Thanks => "Thank you!",
        }
    }

    /// Body text, one entry per line
    pub fn body(&self) -> Vec<String> {
        match self {
            SurveyView::Hidden => Vec::new(),
            SurveyView::Rating => vec![
                "Were you satisfied with the assistant?".to_string(),
                String::new(),
                "[1] Satisfied".to_string(),
                "[2] Not Satisfied".to_string(),
            ],
            SurveyView::Reason { options } => options
                .iter()
                .map(|(n, label)| format!("[{n}] {label}"))
                .collect(),
            SurveyView::Thanks => vec![
                "Your feedback helps us improve.".to_string(),
                "Starting a new conversation...".to_string(),
            ],
        }
    }

    /// Key hint line
    pub fn hint(&self) -> &'static str {
        match self {
            SurveyView::Hidden | SurveyView::Thanks => "",
            SurveyView::Rating => "1/y satisfied · 2/n not satisfied · Esc close",
            SurveyView::Reason { .. } => "1-4 choose · Esc close",
        }
    }
}

/// Everything one frame needs
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayState {
    /// Transcript, oldest first
    pub messages: Vec<DisplayMessage>,
    /// Whether to show the typing placeholder
    pub typing: bool,
    /// Service reachability
    pub backend_status: BackendStatus,
    /// Input draft
    pub draft: String,
    /// Whether keystrokes reach the draft
    pub input_enabled: bool,
    /// Feedback overlay
    pub survey: SurveyView,
}

impl DisplayState {
    /// Derive display state from the core state
    pub fn from_state(state: &ChatState) -> Self {
        let survey = SurveyView::from_step(state.feedback().step());
        Self {
            messages: state
                .transcript()
                .messages()
                .iter()
                .map(DisplayMessage::from)
                .collect(),
            typing: state.is_pending(),
            backend_status: state.backend_status(),
            draft: state.draft().to_string(),
            input_enabled: !survey.is_visible(),
            survey,
        }
    }

    /// Header status text, e.g. `● Online`
    pub fn status_label(&self) -> String {
        let dot = match self.backend_status {
            BackendStatus::Online => "●",
            BackendStatus::Offline => "○",
            BackendStatus::Unknown => "◌",
        };
        format!("{dot} {}", self.backend_status.description())
    }

    /// Conversation text as `(line, kind)` rows, wrapped to `width`
    ///
    /// Each message renders as a heading, its wrapped content, an optional
    /// confidence line and a blank separator.
    pub fn conversation_lines(&self, width: usize) -> Vec<(String, LineKind)> {
        let width = width.max(1);
        let mut lines = Vec::new();

        for msg in &self.messages {
            lines.push((msg.heading(), LineKind::Heading(msg.role)));

            let kind = if msg.error {
                LineKind::Error
            } else {
                LineKind::Body(msg.role)
            };
            for raw in msg.content.lines() {
                if raw.is_empty() {
                    lines.push((String::new(), kind));
                    continue;
                }
                for wrapped in textwrap::wrap(raw, width) {
                    lines.push((wrapped.into_owned(), kind));
                }
            }

            if let Some(label) = &msg.confidence_label {
                lines.push((label.clone(), LineKind::Confidence));
            }
            lines.push((String::new(), LineKind::Blank));
        }

        if self.typing {
            lines.push((
                format!("{ASSISTANT_NAME} is {TYPING_INDICATOR}"),
                LineKind::Typing,
            ));
        }

        lines
    }
}

/// How a conversation row is styled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// Name and time above a message
    Heading(DisplayRole),
    /// Message text
    Body(DisplayRole),
    /// Apology text of a failed exchange
    Error,
    /// `Confidence: NN%`
    Confidence,
    /// Typing placeholder
    Typing,
    /// Separator
    Blank,
}
