use reqwest::StatusCode;
use thiserror::Error;

/// Failures of a round-trip to the events backend. None of these are fatal:
/// reads fall back to the local snapshot, writes surface as a notice.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid backend url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{operation}: request failed: {source}")]
    Network {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{operation}: server answered {status}")]
    Status {
        operation: &'static str,
        status: StatusCode,
    },
    #[error("{operation}: server rejected the request: {message}")]
    Rejected {
        operation: &'static str,
        message: String,
    },
    #[error("{operation}: malformed response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Reasons a draft cannot be submitted. Checked before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,
    #[error("date is required")]
    MissingDate,
    #[error("{0:?} is not a YYYY-MM-DD date")]
    InvalidDate(String),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("local storage i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("local storage encoding: {0}")]
    Json(#[from] serde_json::Error),
}
