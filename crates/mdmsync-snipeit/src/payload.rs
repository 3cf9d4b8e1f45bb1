//! Mapping from MDM device records to Snipe-IT asset payloads.

use mdmsync_core::platform::UNKNOWN_OS_LABEL;
use mdmsync_core::{Device, ModelId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column names of the Snipe-IT custom fields the sync populates.
///
/// Custom field columns are generated per Snipe-IT install; the defaults
/// match the reference fieldsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomFieldMap {
    pub mac_address: String,
    pub disk_used: String,
    pub disk_available: String,
    pub os_info: String,
    pub cpu_family: String,
    pub bluetooth_mac_address: String,
    pub os_version: String,
}

impl Default for CustomFieldMap {
    fn default() -> Self {
        Self {
            mac_address: "_snipeit_mac_address_1".to_string(),
            disk_used: "_snipeit_percent_disk_5".to_string(),
            disk_available: "_snipeit_available_disk_5".to_string(),
            os_info: "_snipeit_os_info_6".to_string(),
            cpu_family: "_snipeit_cpu_family_7".to_string(),
            bluetooth_mac_address: "_snipeit_bluetooth_mac_address_11".to_string(),
            os_version: "_snipeit_osversion_12".to_string(),
        }
    }
}

/// Ready-to-send hardware payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AssetPayload(Map<String, Value>);

impl AssetPayload {
    /// Build the asset fields for `device`.
    ///
    /// Always: name, serial, Bluetooth MAC, OS family label, OS version.
    /// mac and ios: disk used / available as `"<value> GB"`.
    /// mac: CPU family.
    /// MAC address: Ethernet if present, else WiFi, else left out.
    #[must_use]
    pub fn from_device(device: &Device, fields: &CustomFieldMap) -> Self {
        let mut payload = Self::default();
        let platform = device.platform();

        payload.set_opt("name", device.name());
        payload.set_opt("serial", device.serial());
        payload.set_opt(&fields.bluetooth_mac_address, device.bluetooth_mac());
        payload.set(
            &fields.os_info,
            platform.map_or(UNKNOWN_OS_LABEL, |p| p.os_label()),
        );
        payload.set_opt(&fields.os_version, device.os_version());

        if let Some(platform) = platform {
            if platform.reports_disk() {
                payload.set_opt(&fields.disk_used, device.disk_used().map(gigabytes));
                payload.set_opt(&fields.disk_available, device.disk_available().map(gigabytes));
            }
            if platform.reports_cpu() {
                payload.set_opt(&fields.cpu_family, device.cpu());
            }
        }

        payload.set_opt(&fields.mac_address, device.primary_mac());
        payload
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    fn set_opt<V: Into<Value>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of `key`, if set.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn serial(&self) -> Option<&str> {
        self.get_str("serial")
    }

    /// Payload for `POST /hardware`: ready-to-deploy status, model, and the
    /// serial doubling as the initial asset tag.
    #[must_use]
    pub fn for_create(mut self, model_id: ModelId, status_id: u64) -> Self {
        self.set("status_id", status_id);
        self.set("model_id", model_id.get());
        if let Some(serial) = self.serial().map(str::to_string) {
            self.set("asset_tag", serial);
        }
        self
    }

    /// Payload for `PATCH /hardware/{id}`: the serial is immutable once created.
    #[must_use]
    pub fn for_update(mut self, model_id: Option<ModelId>) -> Self {
        self.remove("serial");
        if let Some(model_id) = model_id {
            self.set("model_id", model_id.get());
        }
        self
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

fn gigabytes(value: &str) -> String {
    format!("{value} GB")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device(value: Value) -> Device {
        serde_json::from_value(value).unwrap()
    }

    fn mac() -> Device {
        device(json!({
            "serial_number": "C02XK0AAJGH5",
            "device_model": "MacBookPro18,1",
            "os": "mac",
            "device_name": "Alice's MacBook",
            "osversion": "14.5",
            "cpu_model": "Apple M1 Pro",
            "percent_disk": "41",
            "available_disk": "220",
            "bluetooth_mac_address": "bb:bb",
            "wifi_mac_address": "aa:aa",
            "ethernet_mac_address": "ee:ee",
        }))
    }

    #[test]
    fn test_mac_payload() {
        let fields = CustomFieldMap::default();
        let payload = AssetPayload::from_device(&mac(), &fields);

        assert_eq!(payload.get_str("name"), Some("Alice's MacBook"));
        assert_eq!(payload.serial(), Some("C02XK0AAJGH5"));
        assert_eq!(payload.get_str("_snipeit_os_info_6"), Some("MacOS"));
        assert_eq!(payload.get_str("_snipeit_osversion_12"), Some("14.5"));
        assert_eq!(payload.get_str("_snipeit_cpu_family_7"), Some("Apple M1 Pro"));
        assert_eq!(payload.get_str("_snipeit_percent_disk_5"), Some("41 GB"));
        assert_eq!(payload.get_str("_snipeit_available_disk_5"), Some("220 GB"));
        assert_eq!(payload.get_str("_snipeit_bluetooth_mac_address_11"), Some("bb:bb"));
        assert_eq!(payload.get_str("_snipeit_mac_address_1"), Some("ee:ee"));
    }

    #[test]
    fn test_ios_payload_has_disk_but_no_cpu() {
        let d = device(json!({
            "serial_number": "DMPX",
            "os": "ios",
            "osversion": "17.4",
            "cpu_model": "ignored",
            "percent_disk": 12,
            "available_disk": 50,
            "wifi_mac_address": "aa:aa",
        }));
        let payload = AssetPayload::from_device(&d, &CustomFieldMap::default());
        assert_eq!(payload.get_str("_snipeit_os_info_6"), Some("iOS"));
        assert_eq!(payload.get_str("_snipeit_percent_disk_5"), Some("12 GB"));
        assert!(!payload.contains("_snipeit_cpu_family_7"));
        assert_eq!(payload.get_str("_snipeit_mac_address_1"), Some("aa:aa"));
    }

    #[test]
    fn test_tvos_payload_has_no_disk() {
        let d = device(json!({
            "serial_number": "ATV1",
            "os": "tvos",
            "percent_disk": "3",
        }));
        let payload = AssetPayload::from_device(&d, &CustomFieldMap::default());
        assert_eq!(payload.get_str("_snipeit_os_info_6"), Some("tvos"));
        assert!(!payload.contains("_snipeit_percent_disk_5"));
        assert!(!payload.contains("_snipeit_mac_address_1"));
    }

    #[test]
    fn test_unknown_os_label() {
        let d = device(json!({ "serial_number": "X", "os": "visionos" }));
        let payload = AssetPayload::from_device(&d, &CustomFieldMap::default());
        assert_eq!(payload.get_str("_snipeit_os_info_6"), Some("Not Known"));
    }

    #[test]
    fn test_custom_field_names_are_respected() {
        let fields = CustomFieldMap {
            mac_address: "_snipeit_mac_9".to_string(),
            ..CustomFieldMap::default()
        };
        let payload = AssetPayload::from_device(&mac(), &fields);
        assert_eq!(payload.get_str("_snipeit_mac_9"), Some("ee:ee"));
        assert!(!payload.contains("_snipeit_mac_address_1"));
    }

    #[test]
    fn test_for_create_sets_tag_status_and_model() {
        let payload =
            AssetPayload::from_device(&mac(), &CustomFieldMap::default()).for_create(ModelId::new(4), 2);
        assert_eq!(payload.get("status_id"), Some(&json!(2)));
        assert_eq!(payload.get("model_id"), Some(&json!(4)));
        assert_eq!(payload.get_str("asset_tag"), Some("C02XK0AAJGH5"));
    }

    #[test]
    fn test_for_update_strips_serial() {
        let payload = AssetPayload::from_device(&mac(), &CustomFieldMap::default())
            .for_update(Some(ModelId::new(4)));
        assert!(!payload.contains("serial"));
        assert_eq!(payload.get("model_id"), Some(&json!(4)));

        let payload = AssetPayload::from_device(&mac(), &CustomFieldMap::default()).for_update(None);
        assert!(!payload.contains("model_id"));
    }
}
