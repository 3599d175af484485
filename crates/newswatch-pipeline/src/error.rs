use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure of a single fetch, extraction, or classification call.
///
/// Never escapes the enrichment chain or the classifier gate: both log it and
/// treat the affected field or verdict as unresolved.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or TLS failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The body arrived but did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Map a `reqwest` failure, folding timeouts into [`FetchError::Timeout`].
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Http(err.without_url())
        }
    }
}

/// Configuration and I/O errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unknown column \"{0}\"")]
    UnknownColumn(String),

    #[error("input is missing required column \"{0}\"")]
    MissingColumn(&'static str),

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("CSV parse error on line {line}: {reason}")]
    Csv { line: usize, reason: String },

    #[error("failed to access {path}: {source}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
