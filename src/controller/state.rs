use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::extractor::PageText;
use crate::relay::{AnalysisResult, RelayError};

/// Which panel the popup is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Result,
    Error,
}

/// The analysis currently on screen, kept for feedback.
#[derive(Debug, Clone)]
pub struct CurrentAnalysis {
    pub result: AnalysisResult,
    /// Empty when page text is not retained between analysis and feedback.
    pub text: PageText,
    pub page_url: String,
    pub displayed_at: DateTime<Utc>,
}

/// Why an analysis ended without a result.
#[derive(Error, Debug)]
pub enum AnalysisFailure {
    #[error("No text content found on this page. Please try on a page with financial content.")]
    NoContentFound,

    #[error(
        "Page text is too long ({chars} characters, limit {limit}). Please try with shorter content."
    )]
    ContentTooLong { chars: usize, limit: usize },

    #[error(transparent)]
    Relay(#[from] RelayError),
}
