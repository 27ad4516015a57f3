use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::controller::{
    AnalysisFailure, AnalyzeOutcome, ControllerSettings, ErrorView, FeedbackControls,
    FeedbackOutcome, PopupController, PopupView, ResultView, UiState,
};
use crate::extractor::PageText;
use crate::page::{PageTextResponse, PageTextSource};
use crate::relay::{
    AnalysisResult, MockSentimentService, RelayError, SentimentLabel, SentimentScores,
    UserFeedback,
};

#[derive(Debug, Clone, PartialEq)]
enum ViewEvent {
    Trigger(bool),
    Loading(bool),
    ResultVisible(bool),
    Result(ResultView),
    Error(ErrorView),
    Gauge(bool),
    Feedback(FeedbackControls),
    AckShown,
    AckCleared,
}

#[derive(Default)]
struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl PopupView for RecordingView {
    fn set_trigger_enabled(&self, enabled: bool) {
        self.push(ViewEvent::Trigger(enabled));
    }
    fn set_loading(&self, loading: bool) {
        self.push(ViewEvent::Loading(loading));
    }
    fn set_result_visible(&self, visible: bool) {
        self.push(ViewEvent::ResultVisible(visible));
    }
    fn render_result(&self, result: &ResultView) {
        self.push(ViewEvent::Result(result.clone()));
    }
    fn render_error(&self, error: &ErrorView) {
        self.push(ViewEvent::Error(error.clone()));
    }
    fn set_gauge_visible(&self, visible: bool) {
        self.push(ViewEvent::Gauge(visible));
    }
    fn set_feedback_controls(&self, controls: FeedbackControls) {
        self.push(ViewEvent::Feedback(controls));
    }
    fn show_feedback_ack(&self) {
        self.push(ViewEvent::AckShown);
    }
    fn clear_feedback_ack(&self) {
        self.push(ViewEvent::AckCleared);
    }
}

struct FakePage {
    reply: PageTextResponse,
    /// Served from the second query on, when set.
    later_reply: Option<PageTextResponse>,
    delay: Duration,
    queries: AtomicUsize,
}

impl FakePage {
    fn with_text(text: &str) -> Self {
        Self {
            reply: PageTextResponse::Text {
                text: PageText::new(text),
            },
            later_reply: None,
            delay: Duration::ZERO,
            queries: AtomicUsize::new(0),
        }
    }

    fn with_error(error: &str) -> Self {
        Self {
            reply: PageTextResponse::Error {
                error: error.to_string(),
            },
            ..Self::with_text("")
        }
    }

    fn then_reply(mut self, reply: PageTextResponse) -> Self {
        self.later_reply = Some(reply);
        self
    }

    fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl PageTextSource for FakePage {
    fn page_url(&self) -> String {
        "https://news.example.com/acme".to_string()
    }

    async fn page_text(&self) -> PageTextResponse {
        let previous = self.queries.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.later_reply {
            Some(reply) if previous > 0 => reply.clone(),
            _ => self.reply.clone(),
        }
    }
}

const ARTICLE: &str = "Acme Corp cut its full-year outlook as orders slowed.";

fn negative_result() -> AnalysisResult {
    AnalysisResult {
        label: SentimentLabel::Negative,
        confidence: 0.6,
        scores: SentimentScores {
            negative: 0.6,
            neutral: 0.3,
            positive: 0.1,
        },
        summary: "Outlook cut.".to_string(),
        investment_advice: "Consider reducing exposure.".to_string(),
    }
}

fn controller(
    service: MockSentimentService,
    page: FakePage,
) -> PopupController<MockSentimentService, FakePage, RecordingView> {
    PopupController::new(
        service,
        page,
        RecordingView::default(),
        ControllerSettings::default(),
    )
}

fn analyzing_service() -> MockSentimentService {
    let mut service = MockSentimentService::new();
    service
        .expect_analyze()
        .times(1)
        .returning(|_| Ok(negative_result()));
    service
}

#[tokio::test]
async fn test_successful_analysis_renders_result() {
    let mut service = MockSentimentService::new();
    service
        .expect_analyze()
        .withf(|text: &str| text == ARTICLE)
        .times(1)
        .returning(|_| Ok(negative_result()));
    let popup = controller(service, FakePage::with_text(ARTICLE));

    let outcome = popup.analyze().await;

    let view = match outcome {
        AnalyzeOutcome::Displayed(view) => view,
        other => panic!("expected a displayed result, got {other:?}"),
    };
    assert_eq!(view.score_line(), "Negative (60.0%)");
    assert!((view.gauge_position - 19.8).abs() < 1e-9);
    assert_eq!(popup.state(), UiState::Result);

    let current = popup.current_analysis().unwrap();
    assert_eq!(current.text.as_str(), ARTICLE);
    assert_eq!(current.page_url, "https://news.example.com/acme");

    assert_eq!(
        popup.view().events(),
        vec![
            ViewEvent::Trigger(false),
            ViewEvent::Loading(true),
            ViewEvent::ResultVisible(false),
            ViewEvent::Result(view),
            ViewEvent::Gauge(true),
            ViewEvent::Feedback(FeedbackControls::ready()),
            ViewEvent::ResultVisible(true),
            ViewEvent::Loading(false),
            ViewEvent::Trigger(true),
        ]
    );
}

#[tokio::test]
async fn test_empty_page_is_no_content() {
    let popup = controller(MockSentimentService::new(), FakePage::with_text(""));

    let outcome = popup.analyze().await;

    assert!(matches!(
        outcome,
        AnalyzeOutcome::Failed(AnalysisFailure::NoContentFound)
    ));
    assert_eq!(popup.state(), UiState::Error);
}

#[tokio::test]
async fn test_page_error_is_no_content() {
    let popup = controller(
        MockSentimentService::new(),
        FakePage::with_error("content script unavailable"),
    );

    let outcome = popup.analyze().await;

    assert!(matches!(
        outcome,
        AnalyzeOutcome::Failed(AnalysisFailure::NoContentFound)
    ));
}

#[tokio::test]
async fn test_text_over_limit_is_rejected_before_sending() {
    let page = FakePage::with_text(&"x".repeat(10_001));
    let popup = controller(MockSentimentService::new(), page);

    let outcome = popup.analyze().await;

    match outcome {
        AnalyzeOutcome::Failed(AnalysisFailure::ContentTooLong { chars, limit }) => {
            assert_eq!(chars, 10_001);
            assert_eq!(limit, 10_000);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_relay_failure_renders_error_and_hides_controls() {
    let mut service = MockSentimentService::new();
    service
        .expect_analyze()
        .times(1)
        .returning(|_| Err(RelayError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR)));
    let popup = controller(service, FakePage::with_text(ARTICLE));

    let outcome = popup.analyze().await;

    assert!(matches!(
        outcome,
        AnalyzeOutcome::Failed(AnalysisFailure::Relay(RelayError::ServerError { .. }))
    ));
    assert_eq!(popup.state(), UiState::Error);
    assert!(popup.current_analysis().is_none());

    let events = popup.view().events();
    assert!(events.contains(&ViewEvent::Error(ErrorView::new(
        "Server error occurred. Please try again later."
    ))));
    assert!(events.contains(&ViewEvent::Gauge(false)));
    assert!(events.contains(&ViewEvent::Feedback(FeedbackControls::hidden())));
    assert_eq!(events.last(), Some(&ViewEvent::Trigger(true)));
}

#[tokio::test(start_paused = true)]
async fn test_second_trigger_while_loading_is_rejected() {
    let page = FakePage::with_text(ARTICLE).delayed(Duration::from_millis(100));
    let popup = controller(analyzing_service(), page);

    let (first, second) = tokio::join!(popup.analyze(), popup.analyze());

    assert!(matches!(first, AnalyzeOutcome::Displayed(_)));
    assert!(matches!(second, AnalyzeOutcome::Busy));
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_analysis_releases_trigger() {
    let page = FakePage::with_text(ARTICLE).delayed(Duration::from_secs(5));
    let popup = controller(analyzing_service(), page);

    let abandoned = tokio::time::timeout(Duration::from_secs(1), popup.analyze()).await;
    assert!(abandoned.is_err());
    assert_eq!(popup.state(), UiState::Idle);
    assert_eq!(popup.view().events().last(), Some(&ViewEvent::Trigger(true)));

    assert!(matches!(popup.analyze().await, AnalyzeOutcome::Displayed(_)));
}

#[tokio::test(start_paused = true)]
async fn test_feedback_sends_record_and_acknowledges() {
    let mut service = analyzing_service();
    service
        .expect_submit_feedback()
        .withf(|record| {
            record.text == ARTICLE
                && record.predicted_sentiment == SentimentLabel::Negative
                && record.predicted_confidence == 0.6
                && record.user_feedback == UserFeedback::Accurate
                && record.page_url == "https://news.example.com/acme"
                && record.model_version == "1.0"
        })
        .times(1)
        .returning(|_| Ok(()));
    let popup = controller(service, FakePage::with_text(ARTICLE));
    popup.analyze().await;

    let started = tokio::time::Instant::now();
    let outcome = popup.submit_feedback(UserFeedback::Accurate).await;

    assert_eq!(outcome, FeedbackOutcome::Sent);
    assert!(started.elapsed() >= Duration::from_secs(2));

    let events = popup.view().events();
    let tail = &events[events.len() - 3..];
    assert_eq!(
        tail,
        [
            ViewEvent::Feedback(FeedbackControls::submitted(UserFeedback::Accurate)),
            ViewEvent::AckShown,
            ViewEvent::AckCleared,
        ]
    );

    // One verdict per result
    assert_eq!(
        popup.submit_feedback(UserFeedback::Inaccurate).await,
        FeedbackOutcome::Ignored
    );
}

#[tokio::test]
async fn test_feedback_failure_is_silent() {
    let mut service = analyzing_service();
    service.expect_submit_feedback().times(1).returning(|_| {
        Err(RelayError::NetworkError {
            server: "http://localhost:5001".to_string(),
            detail: "connection refused".to_string(),
        })
    });
    let popup = controller(service, FakePage::with_text(ARTICLE));
    popup.analyze().await;
    let before = popup.view().events().len();

    let outcome = popup.submit_feedback(UserFeedback::Inaccurate).await;

    assert_eq!(outcome, FeedbackOutcome::Failed);
    assert_eq!(popup.state(), UiState::Result);
    assert!(popup.current_analysis().is_some());
    assert_eq!(
        popup.view().events()[before..],
        [ViewEvent::Feedback(FeedbackControls::submitted(
            UserFeedback::Inaccurate
        ))]
    );
}

#[tokio::test]
async fn test_feedback_without_result_is_ignored() {
    let popup = controller(MockSentimentService::new(), FakePage::with_text(ARTICLE));

    assert_eq!(
        popup.submit_feedback(UserFeedback::Accurate).await,
        FeedbackOutcome::Ignored
    );
    assert!(popup.view().events().is_empty());
}

#[tokio::test]
async fn test_feedback_queries_page_when_text_not_retained() {
    let mut service = analyzing_service();
    service
        .expect_submit_feedback()
        .withf(|record| record.text == ARTICLE)
        .times(1)
        .returning(|_| Ok(()));
    let settings = ControllerSettings {
        retain_text: false,
        ack_duration: Duration::ZERO,
        ..ControllerSettings::default()
    };
    let popup = PopupController::new(
        service,
        FakePage::with_text(ARTICLE),
        RecordingView::default(),
        settings,
    );

    popup.analyze().await;
    assert!(popup.current_analysis().unwrap().text.is_empty());

    assert_eq!(
        popup.submit_feedback(UserFeedback::Accurate).await,
        FeedbackOutcome::Sent
    );
    assert_eq!(popup.page.queries.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_feedback_sends_empty_text_when_page_query_fails() {
    let mut service = analyzing_service();
    service
        .expect_submit_feedback()
        .withf(|record| record.text.is_empty() && record.user_feedback == UserFeedback::Inaccurate)
        .times(1)
        .returning(|_| Ok(()));
    let settings = ControllerSettings {
        retain_text: false,
        ack_duration: Duration::ZERO,
        ..ControllerSettings::default()
    };
    let page = FakePage::with_text(ARTICLE).then_reply(PageTextResponse::Error {
        error: "tab closed".to_string(),
    });
    let popup = PopupController::new(service, page, RecordingView::default(), settings);

    assert!(matches!(popup.analyze().await, AnalyzeOutcome::Displayed(_)));

    assert_eq!(
        popup.submit_feedback(UserFeedback::Inaccurate).await,
        FeedbackOutcome::Sent
    );
    assert_eq!(popup.page.queries.load(Ordering::SeqCst), 2);
}
