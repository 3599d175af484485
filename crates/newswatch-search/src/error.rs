use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Network or TLS failure. The request URL is stripped so API keys never reach logs.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {provider} (retry after {retry_after_secs}s)")]
    RateLimited {
        provider: String,
        retry_after_secs: u64,
    },

    #[error("unexpected HTTP status {status} from {provider}")]
    UnexpectedStatus { status: u16, provider: String },

    #[error("{provider} API error: {message}")]
    Api { provider: String, message: String },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("no search queries configured")]
    EmptyQueryList,

    #[error("no search providers configured")]
    NoProviders,
}
