//! Device records as returned by the Mosyle `listdevices` endpoint.
//!
//! Mosyle is loose with types: numeric columns sometimes arrive as JSON
//! numbers and sometimes as strings, and absent values show up as `null` or
//! `""`. Every column is therefore read leniently into `Option<String>`, and
//! the accessors treat blank strings as missing.

use crate::platform::Platform;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A read-only snapshot of one device in the MDM.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(default, deserialize_with = "lenient_string")]
    pub serial_number: Option<String>,

    /// Hardware model identifier, e.g. `MacBookPro18,1`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub device_model: Option<String>,

    /// Platform as reported by Mosyle (`mac`, `ios`, `tvos`).
    #[serde(default, deserialize_with = "lenient_string")]
    pub os: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub device_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub osversion: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub cpu_model: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub percent_disk: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub available_disk: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub bluetooth_mac_address: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub wifi_mac_address: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub ethernet_mac_address: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub useremail: Option<String>,

    /// Asset tag currently stored on the MDM record.
    #[serde(default, deserialize_with = "lenient_string")]
    pub asset_tag: Option<String>,

    /// Set when a managed user is logged in at the console. Mosyle sends a
    /// username, a boolean or an object depending on the platform.
    #[serde(
        rename = "CurrentConsoleManagedUser",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub current_console_managed_user: Option<Value>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Device {
    /// Serial number, the key shared by both systems.
    #[must_use]
    pub fn serial(&self) -> Option<&str> {
        non_blank(&self.serial_number)
    }

    #[must_use]
    pub fn model(&self) -> Option<&str> {
        non_blank(&self.device_model)
    }

    /// Platform parsed from the `os` column; `None` for unknown values.
    #[must_use]
    pub fn platform(&self) -> Option<Platform> {
        non_blank(&self.os).and_then(|os| os.parse().ok())
    }

    /// Raw `os` column, for log messages about unknown platforms.
    #[must_use]
    pub fn os_raw(&self) -> &str {
        self.os.as_deref().unwrap_or("")
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        non_blank(&self.device_name)
    }

    #[must_use]
    pub fn os_version(&self) -> Option<&str> {
        non_blank(&self.osversion)
    }

    #[must_use]
    pub fn cpu(&self) -> Option<&str> {
        non_blank(&self.cpu_model)
    }

    #[must_use]
    pub fn disk_used(&self) -> Option<&str> {
        non_blank(&self.percent_disk)
    }

    #[must_use]
    pub fn disk_available(&self) -> Option<&str> {
        non_blank(&self.available_disk)
    }

    #[must_use]
    pub fn bluetooth_mac(&self) -> Option<&str> {
        non_blank(&self.bluetooth_mac_address)
    }

    #[must_use]
    pub fn wifi_mac(&self) -> Option<&str> {
        non_blank(&self.wifi_mac_address)
    }

    #[must_use]
    pub fn ethernet_mac(&self) -> Option<&str> {
        non_blank(&self.ethernet_mac_address)
    }

    /// Primary network MAC: Ethernet when present, otherwise WiFi.
    #[must_use]
    pub fn primary_mac(&self) -> Option<&str> {
        self.ethernet_mac().or_else(|| self.wifi_mac())
    }

    #[must_use]
    pub fn user_email(&self) -> Option<&str> {
        non_blank(&self.useremail)
    }

    #[must_use]
    pub fn mdm_asset_tag(&self) -> Option<&str> {
        non_blank(&self.asset_tag)
    }

    /// Whether a managed user is currently logged in at the console.
    #[must_use]
    pub fn has_console_user(&self) -> bool {
        match &self.current_console_managed_user {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(fields)) => !fields.is_empty(),
        }
    }

    /// The user the asset should be checked out to.
    ///
    /// Only set when a managed user is at the console and an email is known;
    /// in every other case the asset is expected to be unassigned.
    #[must_use]
    pub fn intended_assignee(&self) -> Option<&str> {
        if self.has_console_user() {
            self.user_email()
        } else {
            None
        }
    }
}
