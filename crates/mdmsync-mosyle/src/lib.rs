//! Mosyle Manager API client for mdmsync.
//!
//! Authenticates with an access token plus admin credentials, then lists
//! devices per platform (paged or by modification window) and writes asset
//! tags back onto device records.

pub mod client;
pub mod error;
pub mod models;

pub use client::{MosyleClient, MosyleSettings};
pub use error::{MosyleError, MosyleResult};
pub use models::{DeviceQuery, ListMode, ParseListModeError};
