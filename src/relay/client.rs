use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::relay::{
    errors::RelayError,
    types::{AnalysisRequest, AnalysisResult, FeedbackRecord, RawAnalysisResponse},
};

pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_ANALYZE_TIMEOUT: Duration = Duration::from_secs(30);

/// Forwards text to the sentiment server and normalizes what comes back.
#[derive(Debug, Clone)]
pub struct AnalysisRelay {
    client: Client,
    health_timeout: Duration,
    analyze_timeout: Duration,
}

impl Default for AnalysisRelay {
    fn default() -> Self {
        Self::new(DEFAULT_HEALTH_TIMEOUT, DEFAULT_ANALYZE_TIMEOUT)
    }
}

impl AnalysisRelay {
    pub fn new(health_timeout: Duration, analyze_timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            health_timeout,
            analyze_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.health_timeout(), config.analyze_timeout())
    }

    /// Bounded `GET /health`. Anything but a timely 2xx is `ServerUnavailable`.
    #[instrument(skip_all, fields(server = %server_base))]
    pub async fn check_health(&self, server_base: &Url) -> Result<(), RelayError> {
        match self.probe(server_base, self.health_timeout).await {
            Ok(status) if status.is_success() => Ok(()),
            Ok(status) => {
                warn!(status = %status, "health check rejected");
                Err(RelayError::ServerUnavailable)
            }
            Err(e) => {
                warn!(error = %e, "health check failed");
                Err(RelayError::ServerUnavailable)
            }
        }
    }

    /// Raw `GET /health` status.
    pub async fn probe(&self, server_base: &Url, timeout: Duration) -> Result<StatusCode, RelayError> {
        let url = endpoint(server_base, "health")?;
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| RelayError::from_transport(e, server_base))?;
        Ok(response.status())
    }

    /// Health probe followed by `POST /analyze`. Never retried.
    #[instrument(skip_all, fields(server = %server_base, chars = text.chars().count()))]
    pub async fn analyze_sentiment(
        &self,
        text: &str,
        server_base: &Url,
    ) -> Result<AnalysisResult, RelayError> {
        self.check_health(server_base).await?;

        let url = endpoint(server_base, "analyze")?;
        let response = self
            .client
            .post(url)
            .timeout(self.analyze_timeout)
            .json(&AnalysisRequest { text })
            .send()
            .await
            .map_err(|e| RelayError::from_transport(e, server_base))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "analysis request rejected");
            return Err(RelayError::from_status(status));
        }

        let body: RawAnalysisResponse = response.json().await.map_err(|e| {
            if e.is_decode() {
                debug!(error = %e, "undecodable analysis body");
                RelayError::MalformedResponse
            } else {
                RelayError::from_transport(e, server_base)
            }
        })?;

        let result = body.into_result()?;
        info!(
            label = result.label.wire_name(),
            confidence = result.confidence,
            "analysis complete"
        );
        Ok(result)
    }

    /// `POST /feedback`. Callers treat failures as non-fatal.
    #[instrument(skip_all, fields(server = %server_base, feedback = ?record.user_feedback))]
    pub async fn submit_feedback(
        &self,
        record: &FeedbackRecord,
        server_base: &Url,
    ) -> Result<(), RelayError> {
        let url = endpoint(server_base, "feedback")?;
        let response = self
            .client
            .post(url)
            .timeout(self.analyze_timeout)
            .json(record)
            .send()
            .await
            .map_err(|e| RelayError::from_transport(e, server_base))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::ServerError {
                status: Some(status),
                message: format!("Failed to submit feedback ({})", status.as_u16()),
            });
        }

        info!("feedback submitted");
        Ok(())
    }
}

/// Append a path segment to the server base, keeping any base path.
pub fn endpoint(server_base: &Url, path: &str) -> Result<Url, RelayError> {
    let mut url = server_base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| RelayError::NetworkError {
            server: server_base.to_string(),
            detail: "server address cannot be a base URL".to_string(),
        })?
        .pop_if_empty()
        .push(path);
    Ok(url)
}
