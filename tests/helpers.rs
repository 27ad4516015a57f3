#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;

use finanswer::controller::{ErrorView, FeedbackControls, PopupView, ResultView};
use finanswer::extractor::PageText;
use finanswer::page::{PageTextResponse, PageTextSource};

pub fn article_html() -> String {
    r#"<!DOCTYPE html>
<html>
<head><title>Yields Climb - Market Wire</title></head>
<body>
    <nav><a href="/">Home</a> <a href="/subscribe">Subscribe</a></nav>
    <article>
        <h1>Treasury yields climb for a third session</h1>
        <p>Treasury yields rose again on Wednesday as traders pared bets on rate cuts,
        pushing the ten-year note to its highest level since May!!</p>
        <p>Bank stocks outperformed while utilities lagged the broader market.</p>
    </article>
</body>
</html>"#
        .to_string()
}

pub fn analysis_body() -> serde_json::Value {
    serde_json::json!({
        "label": "LABEL_1",
        "confidence": 0.5,
        "scores": { "negative": 0.2, "neutral": 0.5, "positive": 0.3 },
        "summary": "Yields rose on fewer expected cuts.",
        "investment_advice": "Hold current positions."
    })
}

/// Page whose text is fixed up front.
pub struct StaticPage {
    pub url: String,
    pub text: String,
}

impl StaticPage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            url: "https://news.example.com/yields".to_string(),
            text: text.into(),
        }
    }
}

#[async_trait]
impl PageTextSource for StaticPage {
    fn page_url(&self) -> String {
        self.url.clone()
    }

    async fn page_text(&self) -> PageTextResponse {
        PageTextResponse::Text {
            text: PageText::new(self.text.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Result(ResultView),
    Error(ErrorView),
    Feedback(FeedbackControls),
    Ack,
}

/// View that remembers what was rendered, ignoring visibility toggles.
#[derive(Default)]
pub struct RecordingView {
    rendered: Mutex<Vec<Rendered>>,
    trigger_enabled: Mutex<Option<bool>>,
}

impl RecordingView {
    pub fn rendered(&self) -> Vec<Rendered> {
        self.rendered.lock().unwrap().clone()
    }

    pub fn trigger_enabled(&self) -> Option<bool> {
        *self.trigger_enabled.lock().unwrap()
    }

    fn push(&self, item: Rendered) {
        self.rendered.lock().unwrap().push(item);
    }
}

impl PopupView for RecordingView {
    fn set_trigger_enabled(&self, enabled: bool) {
        *self.trigger_enabled.lock().unwrap() = Some(enabled);
    }
    fn set_loading(&self, _loading: bool) {}
    fn set_result_visible(&self, _visible: bool) {}
    fn render_result(&self, result: &ResultView) {
        self.push(Rendered::Result(result.clone()));
    }
    fn render_error(&self, error: &ErrorView) {
        self.push(Rendered::Error(error.clone()));
    }
    fn set_gauge_visible(&self, _visible: bool) {}
    fn set_feedback_controls(&self, controls: FeedbackControls) {
        self.push(Rendered::Feedback(controls));
    }
    fn show_feedback_ack(&self) {
        self.push(Rendered::Ack);
    }
    fn clear_feedback_ack(&self) {}
}
