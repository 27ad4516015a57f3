//! Popup controller: drives one user-triggered analysis through
//! `Idle -> Loading -> Result | Error` and handles the feedback side channel.
//!
//! A new analysis can be triggered from any state except `Loading`; while one
//! is in flight further triggers are rejected without contacting the server.

pub mod gauge;
pub mod state;
pub mod terminal;
pub mod view;

#[cfg(test)]
mod tests;

pub use state::{AnalysisFailure, CurrentAnalysis, UiState};
pub use terminal::TerminalView;
pub use view::{ErrorView, FeedbackControls, PopupView, ResultView};

use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::extractor::PageText;
use crate::page::PageTextSource;
use crate::relay::{AnalysisResult, FeedbackRecord, SentimentService, UserFeedback};

pub const FEEDBACK_ACK_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    /// Zero disables the client-side length check.
    pub max_text_chars: usize,
    pub model_version: String,
    /// Keep the analyzed text for feedback instead of querying the page again.
    pub retain_text: bool,
    pub ack_duration: Duration,
}

impl ControllerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_text_chars: config.max_text_chars(),
            model_version: config.model_version().to_string(),
            retain_text: true,
            ack_duration: FEEDBACK_ACK_DURATION,
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug)]
pub enum AnalyzeOutcome {
    Displayed(ResultView),
    Failed(AnalysisFailure),
    /// Another analysis was already in flight.
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackOutcome {
    Sent,
    /// Delivery failed; logged only.
    Failed,
    /// No result on screen, or feedback already given for it.
    Ignored,
}

#[derive(Debug, Default)]
struct PopupState {
    ui: UiState,
    current: Option<CurrentAnalysis>,
    feedback_submitted: bool,
}

pub struct PopupController<S, P, V> {
    service: S,
    page: P,
    view: V,
    settings: ControllerSettings,
    in_flight: AtomicBool,
    state: Mutex<PopupState>,
}

/// Restores the trigger and loading indicator however an analysis ends,
/// including when its future is dropped.
struct FlightGuard<'a, S, P, V: PopupView> {
    controller: &'a PopupController<S, P, V>,
}

impl<S, P, V: PopupView> Drop for FlightGuard<'_, S, P, V> {
    fn drop(&mut self) {
        let controller = self.controller;
        {
            let mut state = controller.lock_state();
            if state.ui == UiState::Loading {
                state.ui = UiState::Idle;
            }
        }
        controller.view.set_loading(false);
        controller.view.set_trigger_enabled(true);
        controller.in_flight.store(false, Ordering::Release);
    }
}

impl<S, P, V> PopupController<S, P, V>
where
    S: SentimentService,
    P: PageTextSource,
    V: PopupView,
{
    pub fn new(service: S, page: P, view: V, settings: ControllerSettings) -> Self {
        Self {
            service,
            page,
            view,
            settings,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(PopupState::default()),
        }
    }

    pub fn state(&self) -> UiState {
        self.lock_state().ui
    }

    pub fn current_analysis(&self) -> Option<CurrentAnalysis> {
        self.lock_state().current.clone()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Run the analyze action end to end.
    #[instrument(skip_all, fields(page = %self.page.page_url()))]
    pub async fn analyze(&self) -> AnalyzeOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("analysis already in flight");
            return AnalyzeOutcome::Busy;
        }
        let _guard = FlightGuard { controller: self };

        self.lock_state().ui = UiState::Loading;
        self.view.set_trigger_enabled(false);
        self.view.set_loading(true);
        self.view.set_result_visible(false);

        match self.run_analysis().await {
            Ok((text, result)) => AnalyzeOutcome::Displayed(self.show_result(text, result)),
            Err(failure) => {
                self.show_failure(&failure);
                AnalyzeOutcome::Failed(failure)
            }
        }
    }

    async fn run_analysis(&self) -> Result<(PageText, AnalysisResult), AnalysisFailure> {
        let text = self.page.page_text().await.into_result().map_err(|e| {
            warn!(error = %e, "page text unavailable");
            AnalysisFailure::NoContentFound
        })?;

        if text.is_empty() {
            return Err(AnalysisFailure::NoContentFound);
        }

        let chars = text.char_len();
        let limit = self.settings.max_text_chars;
        if limit > 0 && chars > limit {
            return Err(AnalysisFailure::ContentTooLong { chars, limit });
        }

        let result = self.service.analyze(text.as_str()).await?;
        Ok((text, result))
    }

    fn show_result(&self, text: PageText, result: AnalysisResult) -> ResultView {
        let view_model = ResultView::from_result(&result);
        info!(score = %view_model.score_line(), gauge = view_model.gauge_position, "showing result");

        {
            let mut state = self.lock_state();
            state.ui = UiState::Result;
            state.feedback_submitted = false;
            state.current = Some(CurrentAnalysis {
                result,
                text: if self.settings.retain_text {
                    text
                } else {
                    PageText::default()
                },
                page_url: self.page.page_url(),
                displayed_at: Utc::now(),
            });
        }

        self.view.render_result(&view_model);
        self.view.set_gauge_visible(true);
        self.view.set_feedback_controls(FeedbackControls::ready());
        self.view.set_result_visible(true);
        view_model
    }

    fn show_failure(&self, failure: &AnalysisFailure) {
        warn!(error = %failure, "analysis failed");

        {
            let mut state = self.lock_state();
            state.ui = UiState::Error;
            state.current = None;
        }

        self.view.render_error(&ErrorView::new(failure.to_string()));
        self.view.set_gauge_visible(false);
        self.view.set_feedback_controls(FeedbackControls::hidden());
        self.view.set_result_visible(true);
    }

    /// Send the user's verdict on the displayed result. Best effort: failures
    /// are logged and never change what is on screen.
    #[instrument(skip(self))]
    pub async fn submit_feedback(&self, feedback: UserFeedback) -> FeedbackOutcome {
        let current = {
            let mut state = self.lock_state();
            if state.ui != UiState::Result || state.feedback_submitted {
                return FeedbackOutcome::Ignored;
            }
            let Some(current) = state.current.clone() else {
                return FeedbackOutcome::Ignored;
            };
            state.feedback_submitted = true;
            current
        };

        self.view
            .set_feedback_controls(FeedbackControls::submitted(feedback));

        let record =
            build_feedback_record(&current, feedback, &self.page, &self.settings.model_version)
                .await;

        match self.service.submit_feedback(&record).await {
            Ok(()) => {
                self.view.show_feedback_ack();
                tokio::time::sleep(self.settings.ack_duration).await;
                self.view.clear_feedback_ack();
                FeedbackOutcome::Sent
            }
            Err(e) => {
                warn!(error = %e, "feedback submission failed");
                FeedbackOutcome::Failed
            }
        }
    }
}

impl<S, P, V> PopupController<S, P, V> {
    fn lock_state(&self) -> MutexGuard<'_, PopupState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Assemble the feedback record for a displayed analysis, querying the page
/// again when its text was not kept.
pub async fn build_feedback_record<P: PageTextSource + ?Sized>(
    current: &CurrentAnalysis,
    feedback: UserFeedback,
    page: &P,
    model_version: &str,
) -> FeedbackRecord {
    let text = if current.text.is_empty() {
        match page.page_text().await.into_result() {
            Ok(text) => text.into_inner(),
            Err(e) => {
                debug!(error = %e, "could not extract text for feedback");
                String::new()
            }
        }
    } else {
        current.text.as_str().to_string()
    };

    FeedbackRecord {
        text,
        predicted_sentiment: current.result.label,
        predicted_confidence: current.result.confidence,
        user_feedback: feedback,
        timestamp: current.displayed_at,
        page_url: current.page_url.clone(),
        model_version: model_version.to_string(),
    }
}
