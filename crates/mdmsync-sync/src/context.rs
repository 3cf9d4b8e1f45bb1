//! Everything one run needs, passed in explicitly.

use crate::progress::ProgressReporter;
use crate::traits::{AssetStore, DeviceSource};
use mdmsync_core::Platform;
use mdmsync_mosyle::ListMode;
use std::time::Duration;

/// How far back timestamp mode looks for modified devices.
pub const DEFAULT_TIMESTAMP_LOOKBACK: Duration = Duration::from_secs(200);

/// Run options from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Platforms to sync, in order.
    pub platforms: Vec<Platform>,
    pub list_mode: ListMode,
    pub timestamp_lookback: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            platforms: Platform::ALL.to_vec(),
            list_mode: ListMode::All,
            timestamp_lookback: DEFAULT_TIMESTAMP_LOOKBACK,
        }
    }
}

/// Clients, progress sink and options for one run.
#[derive(Clone, Copy)]
pub struct SyncContext<'a> {
    pub source: &'a dyn DeviceSource,
    pub store: &'a dyn AssetStore,
    pub progress: &'a dyn ProgressReporter,
    pub options: &'a SyncOptions,
}

impl<'a> SyncContext<'a> {
    #[must_use]
    pub fn new(
        source: &'a dyn DeviceSource,
        store: &'a dyn AssetStore,
        progress: &'a dyn ProgressReporter,
        options: &'a SyncOptions,
    ) -> Self {
        Self {
            source,
            store,
            progress,
            options,
        }
    }
}
