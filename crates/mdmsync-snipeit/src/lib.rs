//! Snipe-IT client for mdmsync.
//!
//! - [`http`] - the resilient request wrapper (local rate limit, retry on 429/5xx)
//! - [`client`] - typed Snipe-IT operations used by the reconciliation driver
//! - [`payload`] - mapping from MDM device fields to asset custom fields
//! - [`image`] - best-effort model artwork lookup against AppleDB

pub mod client;
pub mod error;
pub mod http;
pub mod image;
pub mod models;
pub mod payload;
pub mod retry;

pub use client::{SnipeClient, SnipeSettings};
pub use error::{SnipeError, SnipeResult};
pub use http::{ApiResponse, ResilientClient};
pub use image::ImageCatalog;
pub use models::{Assignee, HardwareLookup, HardwareRow, ModelRow, UserRow};
pub use payload::{AssetPayload, CustomFieldMap};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
