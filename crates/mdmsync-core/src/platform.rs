//! Apple platform categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// OS family label written for devices whose platform is not recognised.
pub const UNKNOWN_OS_LABEL: &str = "Not Known";

/// The device platforms Mosyle reports and Snipe-IT categorises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Mac,
    Ios,
    Tvos,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown device platform '{0}' (expected mac, ios or tvos)")]
pub struct ParsePlatformError(pub String);

impl Platform {
    /// All platforms, in the order they are usually synced.
    pub const ALL: [Platform; 3] = [Platform::Mac, Platform::Ios, Platform::Tvos];

    /// The value Mosyle uses for this platform in `os` fields and filters.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Mac => "mac",
            Platform::Ios => "ios",
            Platform::Tvos => "tvos",
        }
    }

    /// The OS family label stored on the Snipe-IT asset.
    #[must_use]
    pub fn os_label(self) -> &'static str {
        match self {
            Platform::Mac => "MacOS",
            Platform::Ios => "iOS",
            Platform::Tvos => "tvos",
        }
    }

    /// Whether the MDM reports disk usage for this platform.
    #[must_use]
    pub fn reports_disk(self) -> bool {
        matches!(self, Platform::Mac | Platform::Ios)
    }

    /// Whether the MDM reports a CPU model for this platform.
    #[must_use]
    pub fn reports_cpu(self) -> bool {
        matches!(self, Platform::Mac)
    }

    /// Parse a comma separated list such as `"mac, ios,tvos"`.
    pub fn parse_list(list: &str) -> Result<Vec<Platform>, ParsePlatformError> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mac" => Ok(Platform::Mac),
            "ios" => Ok(Platform::Ios),
            "tvos" => Ok(Platform::Tvos),
            other => Err(ParsePlatformError(other.to_string())),
        }
    }
}
