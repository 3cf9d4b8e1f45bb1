//! Per-device outcomes and run totals.

use std::fmt;

/// Why a device was left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingSerial,
    MissingModel,
    /// A new model was needed but the `os` value is not a known platform.
    UnknownOs(String),
    /// Snipe-IT holds more than one asset with this serial.
    AmbiguousSerial(u64),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingSerial => f.write_str("device has no serial number"),
            SkipReason::MissingModel => f.write_str("device has no model identifier"),
            SkipReason::UnknownOs(os) => write!(f, "unknown OS type '{os}'"),
            SkipReason::AmbiguousSerial(total) => {
                write!(f, "{total} assets share this serial")
            }
        }
    }
}

/// Result of reconciling one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceOutcome {
    Created,
    Updated,
    Skipped(SkipReason),
    Failed(String),
}

impl DeviceOutcome {
    /// Whether the device counts as processed.
    #[must_use]
    pub fn is_processed(&self) -> bool {
        matches!(self, DeviceOutcome::Created | DeviceOutcome::Updated)
    }
}

/// Totals for one run. `processed` is `created + updated`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: u64,
    pub created: u64,
    pub updated: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &DeviceOutcome) {
        match outcome {
            DeviceOutcome::Created => self.created += 1,
            DeviceOutcome::Updated => self.updated += 1,
            DeviceOutcome::Skipped(_) => self.skipped += 1,
            DeviceOutcome::Failed(_) => self.failed += 1,
        }
        if outcome.is_processed() {
            self.processed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts() {
        let mut summary = RunSummary::default();
        summary.record(&DeviceOutcome::Created);
        summary.record(&DeviceOutcome::Updated);
        summary.record(&DeviceOutcome::Updated);
        summary.record(&DeviceOutcome::Skipped(SkipReason::MissingSerial));
        summary.record(&DeviceOutcome::Failed("boom".into()));

        assert_eq!(
            summary,
            RunSummary {
                processed: 3,
                created: 1,
                updated: 2,
                skipped: 1,
                failed: 1,
            }
        );
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(
            SkipReason::UnknownOs("visionos".into()).to_string(),
            "unknown OS type 'visionos'"
        );
        assert_eq!(
            SkipReason::AmbiguousSerial(2).to_string(),
            "2 assets share this serial"
        );
    }
}
