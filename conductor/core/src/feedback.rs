//! Feedback Flow
//!
//! The post-conversation satisfaction survey.
//!
//! ```text
//!   closed ──end chat──► rating ──satisfied──────────────► thanks ──delay──► closed (+ reset)
//!                          │                                  ▲
//!                          └──not satisfied──► reason ──pick──┘
//!   rating / reason ──close──► closed (no report)
//! ```
//!
//! The methods here only move the step pointer and refuse illegal moves.
//! Building reports and scheduling the auto-close lives in
//! [`crate::transition`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default time the thank-you card stays visible
pub const DEFAULT_THANKS_DELAY: Duration = Duration::from_secs(3);

/// Survey step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackStep {
    /// Overlay hidden
    #[default]
    Closed,
    /// Asking whether the user was satisfied
    Rating,
    /// Asking why the user was not satisfied
    Reason,
    /// Thank-you card; closes itself
    Thanks,
}

/// Why the user was not satisfied
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackReason {
    /// The answer was wrong
    #[serde(rename = "Inaccurate Information")]
    InaccurateInformation,
    /// The answer took too long
    #[serde(rename = "Slow Response")]
    SlowResponse,
    /// The assistant missed the point of the question
    #[serde(rename = "Did not understand")]
    DidNotUnderstand,
    /// Anything else
    #[serde(rename = "Other")]
    Other,
}

impl FeedbackReason {
    /// Every reason, in the order surfaces list them
    pub const ALL: [FeedbackReason; 4] = [
        FeedbackReason::InaccurateInformation,
        FeedbackReason::SlowResponse,
        FeedbackReason::DidNotUnderstand,
        FeedbackReason::Other,
    ];

    /// Label shown to the user and sent to the service
    pub fn label(&self) -> &'static str {
        match self {
            Self::InaccurateInformation => "Inaccurate Information",
            Self::SlowResponse => "Slow Response",
            Self::DidNotUnderstand => "Did not understand",
            Self::Other => "Other",
        }
    }

    /// Look up a reason by its 1-based menu position
    pub fn from_menu_index(index: usize) -> Option<Self> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl std::fmt::Display for FeedbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifies one scheduled auto-close; stale tickets are ignored
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AutoCloseTicket(pub u64);

/// Survey state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedbackFlow {
    step: FeedbackStep,
    satisfaction: Option<bool>,
    reason: Option<FeedbackReason>,
    ticket: AutoCloseTicket,
    thanks_delay: Duration,
}

impl FeedbackFlow {
    /// Create a closed flow with the given thank-you delay
    pub fn new(thanks_delay: Duration) -> Self {
        Self {
            step: FeedbackStep::Closed,
            satisfaction: None,
            reason: None,
            ticket: AutoCloseTicket::default(),
            thanks_delay,
        }
    }

    /// Current step
    pub fn step(&self) -> FeedbackStep {
        self.step
    }

    /// Whether the overlay is shown
    pub fn is_active(&self) -> bool {
        self.step != FeedbackStep::Closed
    }

    /// Rating given so far, if any
    pub fn satisfaction(&self) -> Option<bool> {
        self.satisfaction
    }

    /// Reason picked so far, if any
    pub fn reason(&self) -> Option<FeedbackReason> {
        self.reason
    }

    /// How long the thank-you card stays up
    pub fn thanks_delay(&self) -> Duration {
        self.thanks_delay
    }

    /// `closed → rating`
    pub fn open(&mut self) -> bool {
        if self.step != FeedbackStep::Closed {
            return false;
        }
        self.step = FeedbackStep::Rating;
        self.satisfaction = None;
        self.reason = None;
        true
    }

    /// Record the rating; `rating → thanks` or `rating → reason`
    pub fn rate(&mut self, satisfied: bool) -> bool {
        if self.step != FeedbackStep::Rating {
            return false;
        }
        self.satisfaction = Some(satisfied);
        self.step = if satisfied {
            FeedbackStep::Thanks
        } else {
            FeedbackStep::Reason
        };
        true
    }

    /// Record the reason; `reason → thanks`
    pub fn choose_reason(&mut self, reason: FeedbackReason) -> bool {
        if self.step != FeedbackStep::Reason || self.satisfaction != Some(false) {
            return false;
        }
        self.reason = Some(reason);
        self.step = FeedbackStep::Thanks;
        true
    }

    /// Abandon the survey; not allowed once thanked
    pub fn close(&mut self) -> bool {
        if !matches!(self.step, FeedbackStep::Rating | FeedbackStep::Reason) {
            return false;
        }
        self.clear();
        true
    }

    /// Issue a fresh auto-close ticket, invalidating any earlier one
    pub fn arm_auto_close(&mut self) -> AutoCloseTicket {
        self.ticket = AutoCloseTicket(self.ticket.0.wrapping_add(1));
        self.ticket
    }

    /// `thanks → closed` for the given ticket
    pub fn finish(&mut self, ticket: AutoCloseTicket) -> bool {
        if self.step != FeedbackStep::Thanks || ticket != self.ticket {
            return false;
        }
        self.clear();
        true
    }

    fn clear(&mut self) {
        self.step = FeedbackStep::Closed;
        self.satisfaction = None;
        self.reason = None;
    }
}

impl Default for FeedbackFlow {
    fn default() -> Self {
        Self::new(DEFAULT_THANKS_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_satisfied_path() {
        let mut flow = FeedbackFlow::default();
        assert!(flow.open());
        assert_eq!(flow.step(), FeedbackStep::Rating);

        assert!(flow.rate(true));
        assert_eq!(flow.step(), FeedbackStep::Thanks);
        assert_eq!(flow.satisfaction(), Some(true));

        let ticket = flow.arm_auto_close();
        assert!(flow.finish(ticket));
        assert_eq!(flow.step(), FeedbackStep::Closed);
        assert!(!flow.is_active());
    }

    #[test]
    fn test_unsatisfied_path() {
        let mut flow = FeedbackFlow::default();
        flow.open();
        assert!(flow.rate(false));
        assert_eq!(flow.step(), FeedbackStep::Reason);

        assert!(flow.choose_reason(FeedbackReason::SlowResponse));
        assert_eq!(flow.step(), FeedbackStep::Thanks);
        assert_eq!(flow.reason(), Some(FeedbackReason::SlowResponse));
    }

    #[test]
    fn test_reason_requires_rating_first() {
        let mut flow = FeedbackFlow::default();
        flow.open();
        assert!(!flow.choose_reason(FeedbackReason::Other));
        assert_eq!(flow.step(), FeedbackStep::Rating);
    }

    #[test]
    fn test_open_only_from_closed() {
        let mut flow = FeedbackFlow::default();
        assert!(flow.open());
        assert!(!flow.open());
        flow.rate(true);
        assert!(!flow.open());
        assert_eq!(flow.step(), FeedbackStep::Thanks);
    }

    #[test]
    fn test_close_abandons_without_thanks() {
        let mut flow = FeedbackFlow::default();
        flow.open();
        assert!(flow.close());
        assert_eq!(flow.step(), FeedbackStep::Closed);

        flow.open();
        flow.rate(false);
        assert!(flow.close());
        assert_eq!(flow.satisfaction(), None);
    }

    #[test]
    fn test_close_refused_while_thanking() {
        let mut flow = FeedbackFlow::default();
        flow.open();
        flow.rate(true);
        assert!(!flow.close());
        assert_eq!(flow.step(), FeedbackStep::Thanks);
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut flow = FeedbackFlow::default();
        flow.open();
        flow.rate(true);
        let first = flow.arm_auto_close();
        let second = flow.arm_auto_close();

        assert!(!flow.finish(first));
        assert_eq!(flow.step(), FeedbackStep::Thanks);
        assert!(flow.finish(second));
    }

    #[test]
    fn test_reason_labels_and_menu() {
        assert_eq!(FeedbackReason::SlowResponse.label(), "Slow Response");
        assert_eq!(
            FeedbackReason::from_menu_index(1),
            Some(FeedbackReason::InaccurateInformation)
        );
        assert_eq!(FeedbackReason::from_menu_index(4), Some(FeedbackReason::Other));
        assert_eq!(FeedbackReason::from_menu_index(0), None);
        assert_eq!(FeedbackReason::from_menu_index(5), None);
    }

    #[test]
    fn test_reason_serializes_as_label() {
        for reason in FeedbackReason::ALL {
            let json = serde_json::to_string(&reason).unwrap();
            assert_eq!(json, format!("\"{}\"", reason.label()));
        }
    }
}
