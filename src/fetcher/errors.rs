use thiserror::Error;

/// Why a page could not be downloaded or decoded.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("page address is not a valid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("page host unreachable: {0}")]
    Connect(String),

    #[error("timed out connecting to page host")]
    ConnectTimeout,

    #[error("timed out downloading page")]
    RequestTimeout,

    #[error("page redirected too many times")]
    RedirectLoop,

    #[error("page returned HTTP {0}")]
    Http(reqwest::StatusCode),

    #[error("page exceeds download limit ({0} bytes)")]
    BodyTooLarge(u64),

    #[error("not an HTML page: {0}")]
    UnsupportedContentType(String),

    #[error("page text could not be decoded: {0}")]
    Charset(String),

    #[error("page body read failed: {0}")]
    Io(String),

    #[error("page download failed: {0}")]
    Unknown(String),
}

impl FetchError {
    /// Classify a transport error from the page client.
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return match err.is_connect() {
                true => Self::ConnectTimeout,
                false => Self::RequestTimeout,
            };
        }
        if err.is_redirect() {
            return Self::RedirectLoop;
        }
        match err.status() {
            Some(status) => Self::Http(status),
            None if err.is_connect() || err.is_request() => Self::Connect(err.to_string()),
            None => Self::Unknown(err.to_string()),
        }
    }
}
