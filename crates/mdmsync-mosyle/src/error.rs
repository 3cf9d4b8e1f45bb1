//! Error types for the Mosyle client.

use thiserror::Error;

/// Result type alias using `MosyleError`.
pub type MosyleResult<T> = Result<T, MosyleError>;

#[derive(Debug, Error)]
pub enum MosyleError {
    /// Transport failure (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Login did not yield a session token.
    #[error("Mosyle authentication failed: {0}")]
    Auth(String),

    /// Non-2xx response.
    #[error("Mosyle returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// 2xx response whose `status` is not `OK`.
    #[error("Mosyle rejected the request: {0}")]
    Rejected(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
