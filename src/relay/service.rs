use async_trait::async_trait;
use url::Url;

use crate::relay::{
    client::AnalysisRelay,
    errors::RelayError,
    types::{AnalysisResult, FeedbackRecord},
};

/// Sentiment backend as seen by the popup controller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SentimentService: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, RelayError>;

    async fn submit_feedback(&self, record: &FeedbackRecord) -> Result<(), RelayError>;
}

/// An [`AnalysisRelay`] bound to one server address.
#[derive(Debug, Clone)]
pub struct RemoteSentimentService {
    relay: AnalysisRelay,
    server_base: Url,
}

impl RemoteSentimentService {
    pub fn new(relay: AnalysisRelay, server_base: Url) -> Self {
        Self { relay, server_base }
    }
}

#[async_trait]
impl SentimentService for RemoteSentimentService {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, RelayError> {
        self.relay.analyze_sentiment(text, &self.server_base).await
    }

    async fn submit_feedback(&self, record: &FeedbackRecord) -> Result<(), RelayError> {
        self.relay.submit_feedback(record, &self.server_base).await
    }
}
