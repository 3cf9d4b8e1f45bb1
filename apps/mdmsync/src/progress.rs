//! Terminal progress bars.

use indicatif::{ProgressBar, ProgressStyle};
use mdmsync_core::Platform;
use mdmsync_sync::ProgressReporter;
use std::sync::Mutex;

const TEMPLATE: &str = "{msg} [{bar:40.green/blue}] {pos}/{len} ({elapsed})";

/// One `indicatif` bar per platform.
#[derive(Default)]
pub struct BarProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl BarProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                f(bar);
            }
        }
    }
}

impl ProgressReporter for BarProgress {
    fn begin(&self, platform: Platform, total: u64) {
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        let bar = ProgressBar::new(total).with_style(style);
        bar.set_message(format!("Processing {platform} devices"));
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn advance(&self) {
        self.with_bar(|bar| bar.inc(1));
    }

    fn finish(&self, platform: Platform) {
        self.with_bar(|bar| bar.finish_with_message(format!("Finished {platform} devices")));
        if let Ok(mut guard) = self.bar.lock() {
            guard.take();
        }
    }
}
