//! mdmsync Core Library
//!
//! Shared types for the Mosyle to Snipe-IT inventory sync.
//!
//! # Modules
//!
//! - [`device`] - Device records as reported by the MDM
//! - [`platform`] - The three Apple platform categories that are synced
//! - [`ids`] - Strongly typed Snipe-IT identifiers (AssetId, ModelId, UserId)
//!
//! # Example
//!
//! ```
//! use mdmsync_core::{Device, Platform};
//!
//! let device: Device = serde_json::from_value(serde_json::json!({
//!     "serial_number": "C02XK0AAJGH5",
//!     "device_model": "MacBookPro18,1",
//!     "os": "mac",
//! }))
//! .unwrap();
//!
//! assert_eq!(device.serial(), Some("C02XK0AAJGH5"));
//! assert_eq!(device.platform(), Some(Platform::Mac));
//! ```

pub mod device;
pub mod ids;
pub mod platform;

pub use device::Device;
pub use ids::{AssetId, ModelId, ParseIdError, UserId};
pub use platform::{ParsePlatformError, Platform};
