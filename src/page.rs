//! The page being analyzed, queried for its main text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::extractor::{PageText, extract_html};
use crate::fetcher::{self, FetchError, pipeline::decode_body};

/// Reply to a text query: `{"text": ...}` or `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageTextResponse {
    Text { text: PageText },
    Error { error: String },
}

impl PageTextResponse {
    pub fn into_result(self) -> Result<PageText, PageError> {
        match self {
            Self::Text { text } => Ok(text),
            Self::Error { error } => Err(PageError::Extraction(error)),
        }
    }
}

impl From<Result<PageText, PageError>> for PageTextResponse {
    fn from(result: Result<PageText, PageError>) -> Self {
        match result {
            Ok(text) => Self::Text { text },
            Err(e) => Self::Error {
                error: e.to_string(),
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("could not read page file: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Extraction(String),
}

/// Host of the page being analyzed.
#[async_trait]
pub trait PageTextSource: Send + Sync {
    /// Address reported alongside feedback.
    fn page_url(&self) -> String;

    /// Extract the page's main text.
    async fn page_text(&self) -> PageTextResponse;
}

/// A page addressed by URL, downloaded on every query.
#[derive(Debug, Clone)]
pub struct RemotePage {
    url: String,
}

impl RemotePage {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    async fn load(&self) -> Result<PageText, PageError> {
        let response = fetcher::fetch(&self.url).await?;
        debug!(url = %response.url_final, charset = ?response.charset, "page loaded");
        Ok(extract_html(&response.body_utf8))
    }
}

#[async_trait]
impl PageTextSource for RemotePage {
    fn page_url(&self) -> String {
        self.url.clone()
    }

    async fn page_text(&self) -> PageTextResponse {
        let result = self.load().await;
        if let Err(e) = &result {
            warn!(url = %self.url, error = %e, "page text query failed");
        }
        result.into()
    }
}

/// An HTML file on disk.
#[derive(Debug, Clone)]
pub struct LocalPage {
    path: PathBuf,
}

impl LocalPage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<PageText, PageError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let (charset, html) = decode_body(&bytes, "text/html")?;
        debug!(path = %self.path.display(), ?charset, "page file read");
        Ok(extract_html(&html))
    }
}

#[async_trait]
impl PageTextSource for LocalPage {
    fn page_url(&self) -> String {
        std::fs::canonicalize(&self.path)
            .ok()
            .and_then(|path| Url::from_file_path(path).ok())
            .map(|url| url.to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    async fn page_text(&self) -> PageTextResponse {
        let result = self.load().await;
        if let Err(e) = &result {
            warn!(path = %self.path.display(), error = %e, "page text query failed");
        }
        result.into()
    }
}
