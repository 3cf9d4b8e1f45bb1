//! Sync error types.

use mdmsync_mosyle::MosyleError;
use mdmsync_snipeit::SnipeError;
use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Snipe-IT: {0}")]
    Snipe(#[from] SnipeError),

    #[error("Mosyle: {0}")]
    Mosyle(#[from] MosyleError),

    /// The run could not start (clients could not be built).
    #[error("sync run could not start: {0}")]
    Setup(String),
}

impl SyncError {
    /// Whether the Snipe-IT transport gave up after exhausting its retries.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, SyncError::Snipe(e) if e.is_exhausted())
    }
}
