//! Snipe-IT client error types.

use thiserror::Error;

pub type SnipeResult<T> = Result<T, SnipeError>;

#[derive(Debug, Error)]
pub enum SnipeError {
    /// Every attempt failed with a retryable condition. Callers skip the
    /// current item and carry on.
    #[error("{method} {path} failed after {attempts} attempt(s)")]
    RetriesExhausted {
        method: String,
        path: String,
        attempts: u32,
    },

    /// Non-retryable HTTP error (4xx other than 429).
    #[error("Snipe-IT returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// HTTP 2xx with a `"status": "error"` envelope.
    #[error("Snipe-IT rejected the request: {0}")]
    Rejected(String),

    #[error("failed to parse Snipe-IT response: {0}")]
    Parse(String),

    #[error("invalid Snipe-IT configuration: {0}")]
    InvalidConfig(String),
}

impl SnipeError {
    /// Whether this error is the retry-exhaustion sentinel.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, SnipeError::RetriesExhausted { .. })
    }
}

impl From<serde_json::Error> for SnipeError {
    fn from(e: serde_json::Error) -> Self {
        SnipeError::Parse(e.to_string())
    }
}
