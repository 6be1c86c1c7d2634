//! Error types for identifier resolution

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unsupported format '{0}'")]
    UnsupportedFormat(String),

    #[error("Store at {endpoint} unavailable: {reason}")]
    StoreUnavailable { endpoint: String, reason: String },

    #[error("Invalid result limit {0}: must be a positive integer")]
    InvalidLimit(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResolveError {
    /// Whether the presentation layer should answer with a client error
    /// (404/4xx) rather than a server failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ResolveError::NotFound(_)
                | ResolveError::UnsupportedFormat(_)
                | ResolveError::InvalidLimit(_)
        )
    }
}
