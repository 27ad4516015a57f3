use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

/// Terminal outcomes of a call to the analysis server. Display strings are
/// meant for the user.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Server is not running. Please start the Finanswer backend server first.")]
    ServerUnavailable,

    #[error("Analysis endpoint not found. Please check server configuration.")]
    EndpointNotFound,

    #[error("{message}")]
    ServerError {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("Text is too long. Please try with shorter content.")]
    PayloadTooLarge,

    #[error("Invalid response from server. Please try again.")]
    MalformedResponse,

    #[error("Server is taking too long to respond. Please try again.")]
    Timeout,

    #[error(
        "Cannot connect to server. Please make sure the Finanswer backend is running on {server}"
    )]
    NetworkError { server: String, detail: String },
}

impl RelayError {
    /// Map a non-success status from `/analyze`.
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            404 => Self::EndpointNotFound,
            413 => Self::PayloadTooLarge,
            500 => Self::ServerError {
                status: Some(status),
                message: "Server error occurred. Please try again later.".to_string(),
            },
            code => Self::ServerError {
                status: Some(status),
                message: format!("Server error ({code}). Please try again."),
            },
        }
    }

    /// Map a transport failure; connection problems name the expected server.
    pub fn from_transport(err: reqwest::Error, server: &Url) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::NetworkError {
                server: server.as_str().trim_end_matches('/').to_string(),
                detail: err.to_string(),
            }
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::EndpointNotFound => Some(StatusCode::NOT_FOUND),
            Self::PayloadTooLarge => Some(StatusCode::PAYLOAD_TOO_LARGE),
            Self::ServerError { status, .. } => *status,
            _ => None,
        }
    }
}
