use thiserror::Error;

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Errors surfaced when constructing a tracker. Delivery failures never
/// appear here — they collapse to `false` at the call site.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Configuration error: missing API key")]
    MissingApiKey,

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
