use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::relay::errors::RelayError;

/// Body of `POST /analyze`.
#[derive(Debug, Serialize)]
pub struct AnalysisRequest<'a> {
    pub text: &'a str,
}

/// Sentiment class predicted by the model, as `LABEL_n` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    #[serde(rename = "LABEL_0")]
    Negative,
    #[serde(rename = "LABEL_1")]
    Neutral,
    #[serde(rename = "LABEL_2")]
    Positive,
}

impl SentimentLabel {
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Negative => "LABEL_0",
            Self::Neutral => "LABEL_1",
            Self::Positive => "LABEL_2",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
            Self::Positive => "Positive",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SentimentLabel {
    type Err = RelayError;

    /// Accepts the model's `LABEL_n` names as well as plain class names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LABEL_0" | "NEGATIVE" => Ok(Self::Negative),
            "LABEL_1" | "NEUTRAL" => Ok(Self::Neutral),
            "LABEL_2" | "POSITIVE" => Ok(Self::Positive),
            _ => Err(RelayError::MalformedResponse),
        }
    }
}

/// Per-class probabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentScores {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
}

impl SentimentScores {
    pub fn for_label(&self, label: SentimentLabel) -> f64 {
        match label {
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Positive => self.positive,
        }
    }
}

/// `/analyze` response body as sent; every field may be missing.
#[derive(Debug, Default, Deserialize)]
pub struct RawAnalysisResponse {
    pub label: Option<String>,
    pub confidence: Option<f64>,
    pub scores: Option<SentimentScores>,
    pub summary: Option<String>,
    pub investment_advice: Option<String>,
    pub error: Option<String>,
}

impl RawAnalysisResponse {
    /// Validate the body into a result. `label` and `confidence` are required.
    pub fn into_result(self) -> Result<AnalysisResult, RelayError> {
        if let Some(message) = self.error.filter(|m| !m.is_empty()) {
            return Err(RelayError::ServerError {
                status: None,
                message,
            });
        }

        let (Some(label), Some(confidence)) = (self.label, self.confidence) else {
            return Err(RelayError::MalformedResponse);
        };

        if !confidence.is_finite() {
            return Err(RelayError::MalformedResponse);
        }

        Ok(AnalysisResult {
            label: label.parse()?,
            confidence: confidence.clamp(0.0, 1.0),
            scores: self.scores.unwrap_or_default(),
            summary: self.summary.unwrap_or_default(),
            investment_advice: self.investment_advice.unwrap_or_default(),
        })
    }
}

/// A validated sentiment analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub label: SentimentLabel,
    pub confidence: f64,
    pub scores: SentimentScores,
    pub summary: String,
    pub investment_advice: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserFeedback {
    Accurate,
    Inaccurate,
}

impl FromStr for UserFeedback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accurate" | "up" => Ok(Self::Accurate),
            "inaccurate" | "down" => Ok(Self::Inaccurate),
            other => Err(format!("unknown feedback '{other}'")),
        }
    }
}

/// Body of `POST /feedback`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRecord {
    pub text: String,
    pub predicted_sentiment: SentimentLabel,
    pub predicted_confidence: f64,
    pub user_feedback: UserFeedback,
    pub timestamp: DateTime<Utc>,
    pub page_url: String,
    pub model_version: String,
}
