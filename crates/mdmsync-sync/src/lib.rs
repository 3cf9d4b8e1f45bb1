//! Mosyle to Snipe-IT reconciliation.
//!
//! - [`reconciler`] - the per-device decision procedure and per-run platform loop
//! - [`assignment`] - checkout planning as a pure function
//! - [`daemon`] - repeated runs on an interval with shutdown
//! - [`traits`] - the MDM and ITAM seams the driver is written against

pub mod assignment;
pub mod context;
pub mod daemon;
pub mod error;
pub mod outcome;
pub mod progress;
pub mod reconciler;
pub mod traits;

pub use assignment::AssignmentAction;
pub use context::{SyncContext, SyncOptions, DEFAULT_TIMESTAMP_LOOKBACK};
pub use daemon::run_daemon;
pub use error::{SyncError, SyncResult};
pub use outcome::{DeviceOutcome, RunSummary, SkipReason};
pub use progress::{NoopProgress, ProgressReporter};
pub use reconciler::{reconcile_device, run_once};
pub use traits::{AssetStore, DeviceSource};
