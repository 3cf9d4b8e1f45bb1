//! Progress reporting seam.

use mdmsync_core::Platform;

/// Receives per-platform progress from the driver.
pub trait ProgressReporter: Send + Sync {
    /// A platform's device list has been fetched.
    fn begin(&self, platform: Platform, total: u64);

    /// One device finished, whatever its outcome.
    fn advance(&self);

    fn finish(&self, platform: Platform);
}

/// Reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn begin(&self, _platform: Platform, _total: u64) {}

    fn advance(&self) {}

    fn finish(&self, _platform: Platform) {}
}
