use crate::controller::gauge::{confidence_percent, gauge_position};
use crate::relay::{AnalysisResult, SentimentLabel, UserFeedback};

pub const ERROR_TITLE: &str = "Error";
pub const ERROR_ADVICE: &str = "Unable to provide investment advice due to analysis error.";
pub const FEEDBACK_ACK: &str = "Thank you for your feedback!";

/// What the result panel shows for a successful analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub label: SentimentLabel,
    pub confidence_percent: String,
    pub gauge_position: f64,
    pub summary: String,
    pub investment_advice: String,
}

impl ResultView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            label: result.label,
            confidence_percent: confidence_percent(result.confidence),
            gauge_position: gauge_position(result.label, &result.scores),
            summary: result.summary.clone(),
            investment_advice: result.investment_advice.clone(),
        }
    }

    /// Headline such as `Positive (91.5%)`.
    pub fn score_line(&self) -> String {
        format!("{} ({}%)", self.label.display_name(), self.confidence_percent)
    }
}

/// What the result panel shows when analysis failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub message: String,
    pub advice: String,
}

impl ErrorView {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            advice: ERROR_ADVICE.to_string(),
        }
    }
}

/// State of the accurate/inaccurate buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackControls {
    pub visible: bool,
    pub enabled: bool,
    pub submitted: Option<UserFeedback>,
}

impl FeedbackControls {
    pub fn ready() -> Self {
        Self {
            visible: true,
            enabled: true,
            submitted: None,
        }
    }

    pub fn hidden() -> Self {
        Self {
            visible: false,
            enabled: false,
            submitted: None,
        }
    }

    pub fn submitted(choice: UserFeedback) -> Self {
        Self {
            visible: true,
            enabled: false,
            submitted: Some(choice),
        }
    }
}

/// Presentation surface driven by the popup controller.
pub trait PopupView: Send + Sync {
    fn set_trigger_enabled(&self, enabled: bool);

    fn set_loading(&self, loading: bool);

    fn set_result_visible(&self, visible: bool);

    fn render_result(&self, result: &ResultView);

    fn render_error(&self, error: &ErrorView);

    fn set_gauge_visible(&self, visible: bool);

    fn set_feedback_controls(&self, controls: FeedbackControls);

    fn show_feedback_ack(&self);

    fn clear_feedback_ack(&self);
}
