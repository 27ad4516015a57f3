use std::io::{self, Write};
use std::sync::Mutex;

use crate::controller::view::{
    ERROR_TITLE, ErrorView, FEEDBACK_ACK, FeedbackControls, PopupView, ResultView,
};

const GAUGE_CELLS: usize = 50;

/// Plain-text rendering of the popup.
pub struct TerminalView<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalView<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn line(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        // write errors such as a closed pipe are dropped
        let _ = writeln!(out, "{text}");
    }
}

/// Three-band bar with `o` at the gauge position.
pub fn render_gauge(position: f64) -> String {
    let last = (GAUGE_CELLS - 1) as f64;
    let mut cells = vec!['-'; GAUGE_CELLS];
    cells[(0.33 * last).round() as usize] = '|';
    cells[(0.67 * last).round() as usize] = '|';
    let marker = (position.clamp(0.0, 100.0) / 100.0 * last).round() as usize;
    cells[marker] = 'o';
    format!("negative [{}] positive", cells.into_iter().collect::<String>())
}

impl<W: Write + Send> PopupView for TerminalView<W> {
    fn set_trigger_enabled(&self, _enabled: bool) {}

    fn set_loading(&self, loading: bool) {
        if loading {
            self.line("Analyzing page...");
        }
    }

    fn set_result_visible(&self, _visible: bool) {}

    fn render_result(&self, result: &ResultView) {
        self.line(&result.score_line());
        self.line(&render_gauge(result.gauge_position));
        self.line("");
        self.line(&format!("Summary: {}", result.summary));
        self.line(&format!("Advice: {}", result.investment_advice));
    }

    fn render_error(&self, error: &ErrorView) {
        self.line(ERROR_TITLE);
        self.line(&error.message);
        self.line(&error.advice);
    }

    fn set_gauge_visible(&self, _visible: bool) {}

    fn set_feedback_controls(&self, controls: FeedbackControls) {
        match controls.submitted {
            Some(choice) => self.line(&format!("Feedback: {choice:?}")),
            None if controls.visible && controls.enabled => {
                self.line("Was this analysis accurate? Rerun with --feedback accurate|inaccurate")
            }
            None => {}
        }
    }

    fn show_feedback_ack(&self) {
        self.line(FEEDBACK_ACK);
    }

    fn clear_feedback_ack(&self) {}
}
