use thiserror::Error;

/// Errors raised while loading or validating run configuration.
///
/// Every variant indicates an operator mistake rather than a transient
/// failure, so callers abort the run instead of retrying.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read roster file {path}: {source}")]
    RosterFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse roster file: {0}")]
    RosterFileParse(#[from] serde_yaml::Error),

    #[error("roster validation error: {0}")]
    Validation(String),
}
