//! Client side of the sentiment server protocol.
//!
//! Every analysis is a health probe followed by a single `POST /analyze`.
//! Failures are terminal and are never retried; [`RelayError`]'s display
//! strings are what the user sees.

pub mod client;
pub mod errors;
pub mod service;
pub mod types;

pub use client::AnalysisRelay;
pub use errors::RelayError;
pub use service::{RemoteSentimentService, SentimentService};
pub use types::{
    AnalysisRequest, AnalysisResult, FeedbackRecord, RawAnalysisResponse, SentimentLabel,
    SentimentScores, UserFeedback,
};

#[cfg(test)]
pub use service::MockSentimentService;
