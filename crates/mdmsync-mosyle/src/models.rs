//! Mosyle request and response shapes.

use chrono::{DateTime, Utc};
use mdmsync_core::Device;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// How devices are pulled from Mosyle on each run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
    /// Page through every device of the platform.
    #[default]
    All,
    /// Only devices modified in a short window ending now.
    Timestamp,
}

impl ListMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ListMode::All => "all",
            ListMode::Timestamp => "timestamp",
        }
    }

    /// The query this mode issues at `now`.
    #[must_use]
    pub fn query_at(&self, now: DateTime<Utc>, lookback: Duration) -> DeviceQuery {
        match self {
            ListMode::All => DeviceQuery::All,
            ListMode::Timestamp => {
                let end = now.timestamp();
                let lookback = i64::try_from(lookback.as_secs()).unwrap_or(i64::MAX);
                DeviceQuery::Modified {
                    start: end.saturating_sub(lookback),
                    end,
                }
            }
        }
    }
}

impl fmt::Display for ListMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown list mode '{0}' (expected all or timestamp)")]
pub struct ParseListModeError(pub String);

impl FromStr for ListMode {
    type Err = ParseListModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ListMode::All),
            "timestamp" => Ok(ListMode::Timestamp),
            _ => Err(ParseListModeError(s.to_string())),
        }
    }
}

/// A device listing request for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceQuery {
    /// Every device, fetched page by page.
    All,
    /// Devices modified between two Unix timestamps.
    Modified { start: i64, end: i64 },
}

/// `{"status": "OK", "response": {...}, "message": ...}`
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<Value>,
    pub response: Option<T>,
}

impl<T> Envelope<T> {
    pub(crate) fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("OK")
    }

    pub(crate) fn describe(&self) -> String {
        let status = self.status.as_deref().unwrap_or("missing status");
        match &self.message {
            Some(Value::String(m)) => format!("{status}: {m}"),
            Some(Value::Null) | None => status.to_string(),
            Some(other) => format!("{status}: {other}"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DeviceList {
    #[serde(default)]
    pub devices: Vec<Device>,
}
