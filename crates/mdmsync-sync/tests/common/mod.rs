//! In-memory stand-ins for Mosyle and Snipe-IT.

#![allow(dead_code)]

use async_trait::async_trait;
use mdmsync_core::{AssetId, Device, ModelId, Platform};
use mdmsync_mosyle::{DeviceQuery, MosyleError};
use mdmsync_snipeit::{
    AssetPayload, Assignee, CustomFieldMap, HardwareLookup, HardwareRow, ModelRow, SnipeError,
};
use mdmsync_sync::{AssetStore, DeviceSource, ProgressReporter, SyncError, SyncResult};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub fn device(value: Value) -> Device {
    serde_json::from_value(value).unwrap()
}

pub fn mac(serial: &str) -> Device {
    device(json!({
        "serial_number": serial,
        "device_model": "MacBookPro18,1",
        "os": "mac",
        "device_name": format!("{serial}-name"),
        "osversion": "14.5",
    }))
}

pub fn exhausted() -> SyncError {
    SnipeError::RetriesExhausted {
        method: "GET".into(),
        path: "/hardware/byserial".into(),
        attempts: 10,
    }
    .into()
}

// ── Device source ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeSource {
    pub devices: Mutex<HashMap<Platform, Vec<Device>>>,
    pub failing: HashSet<Platform>,
    pub queries: Mutex<Vec<(Platform, DeviceQuery)>>,
    pub tag_writes: Mutex<Vec<(String, String)>>,
}

impl FakeSource {
    pub fn with(platform: Platform, devices: Vec<Device>) -> Self {
        let source = Self::default();
        source.devices.lock().unwrap().insert(platform, devices);
        source
    }

    pub fn add(&self, platform: Platform, devices: Vec<Device>) {
        self.devices.lock().unwrap().insert(platform, devices);
    }

    pub fn tag_writes(&self) -> Vec<(String, String)> {
        self.tag_writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceSource for FakeSource {
    async fn list_devices(
        &self,
        platform: Platform,
        query: &DeviceQuery,
    ) -> SyncResult<Vec<Device>> {
        self.queries.lock().unwrap().push((platform, *query));
        if self.failing.contains(&platform) {
            return Err(MosyleError::Rejected("DEVICES_NOTFOUND".into()).into());
        }
        Ok(self
            .devices
            .lock()
            .unwrap()
            .get(&platform)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_asset_tag(&self, serial: &str, tag: &str) -> SyncResult<()> {
        self.tag_writes
            .lock()
            .unwrap()
            .push((serial.to_string(), tag.to_string()));
        for devices in self.devices.lock().unwrap().values_mut() {
            for device in devices.iter_mut() {
                if device.serial() == Some(serial) {
                    device.asset_tag = Some(tag.to_string());
                }
            }
        }
        Ok(())
    }
}

// ── Asset store ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub id: AssetId,
    pub serial: String,
    pub model_id: ModelId,
    pub tag: Option<String>,
    pub assigned: Option<String>,
    pub payload: AssetPayload,
}

#[derive(Default)]
pub struct FakeStore {
    pub assets: Mutex<Vec<StoredAsset>>,
    pub models: Mutex<Vec<(ModelId, String, Platform)>>,
    pub users: Vec<String>,
    pub failing_serials: HashSet<String>,
    pub duplicate_serials: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
    next_id: Mutex<u64>,
}

impl FakeStore {
    pub fn with_users(users: &[&str]) -> Self {
        Self {
            users: users.iter().map(|u| u.to_string()).collect(),
            ..Self::default()
        }
    }

    fn next_id(&self) -> u64 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        *next
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn assets(&self) -> Vec<StoredAsset> {
        self.assets.lock().unwrap().clone()
    }

    pub fn asset(&self, serial: &str) -> Option<StoredAsset> {
        self.assets().into_iter().find(|a| a.serial == serial)
    }

    /// Seed an existing asset (and its model).
    pub fn seed(&self, serial: &str, tag: Option<&str>, assigned: Option<&str>) -> AssetId {
        let model_id = self.seed_model("MacBookPro18,1", Platform::Mac);
        let id = AssetId::new(self.next_id());
        self.assets.lock().unwrap().push(StoredAsset {
            id,
            serial: serial.to_string(),
            model_id,
            tag: tag.map(str::to_string),
            assigned: assigned.map(str::to_string),
            payload: AssetPayload::default(),
        });
        id
    }

    pub fn seed_model(&self, name: &str, platform: Platform) -> ModelId {
        let mut models = self.models.lock().unwrap();
        if let Some((id, _, _)) = models.iter().find(|(_, n, _)| n == name) {
            return *id;
        }
        let id = ModelId::new(100 + models.len() as u64);
        models.push((id, name.to_string(), platform));
        id
    }

    fn row(asset: &StoredAsset) -> HardwareRow {
        HardwareRow {
            id: asset.id,
            asset_tag: asset.tag.clone(),
            serial: Some(asset.serial.clone()),
            name: None,
            assigned_to: asset.assigned.as_ref().map(|email| Assignee {
                id: 1,
                username: None,
                email: Some(email.clone()),
                name: None,
                kind: Some("user".into()),
            }),
        }
    }
}

#[async_trait]
impl AssetStore for FakeStore {
    async fn find_asset_by_serial(&self, serial: &str) -> SyncResult<HardwareLookup> {
        self.log(format!("lookup:{serial}"));
        if self.failing_serials.contains(serial) {
            return Err(exhausted());
        }
        let rows: Vec<HardwareRow> = self
            .assets
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.serial == serial)
            .map(Self::row)
            .collect();
        let total = if self.duplicate_serials.contains(serial) {
            2
        } else {
            rows.len() as u64
        };
        Ok(HardwareLookup { total, rows })
    }

    async fn find_model(&self, name: &str) -> SyncResult<Option<ModelRow>> {
        Ok(self
            .models
            .lock()
            .unwrap()
            .iter()
            .find(|(_, n, _)| n == name)
            .map(|(id, n, _)| ModelRow {
                id: *id,
                name: Some(n.clone()),
                model_number: Some(n.clone()),
                image: None,
            }))
    }

    async fn create_model(&self, platform: Platform, name: &str) -> SyncResult<ModelId> {
        self.log(format!("create_model:{name}:{platform}"));
        Ok(self.seed_model(name, platform))
    }

    async fn create_asset(&self, model_id: ModelId, payload: AssetPayload) -> SyncResult<AssetId> {
        let serial = payload.serial().unwrap_or_default().to_string();
        self.log(format!("create_asset:{serial}"));
        let id = AssetId::new(self.next_id());
        self.assets.lock().unwrap().push(StoredAsset {
            id,
            serial: serial.clone(),
            model_id,
            tag: Some(serial),
            assigned: None,
            payload,
        });
        Ok(id)
    }

    async fn update_asset(
        &self,
        asset_id: AssetId,
        payload: AssetPayload,
        model_id: Option<ModelId>,
    ) -> SyncResult<()> {
        self.log(format!("update_asset:{asset_id}"));
        let mut assets = self.assets.lock().unwrap();
        if let Some(asset) = assets.iter_mut().find(|a| a.id == asset_id) {
            asset.payload = payload;
            if let Some(model_id) = model_id {
                asset.model_id = model_id;
            }
        }
        Ok(())
    }

    async fn assign_user(&self, email: &str, asset_id: AssetId) -> SyncResult<bool> {
        let Some(user) = self.users.iter().find(|u| u.eq_ignore_ascii_case(email)) else {
            return Ok(false);
        };
        self.log(format!("checkout:{asset_id}:{user}"));
        let mut assets = self.assets.lock().unwrap();
        if let Some(asset) = assets.iter_mut().find(|a| a.id == asset_id) {
            asset.assigned = Some(user.clone());
        }
        Ok(true)
    }

    async fn unassign(&self, asset_id: AssetId) -> SyncResult<()> {
        self.log(format!("checkin:{asset_id}"));
        let mut assets = self.assets.lock().unwrap();
        if let Some(asset) = assets.iter_mut().find(|a| a.id == asset_id) {
            asset.assigned = None;
        }
        Ok(())
    }

    fn build_asset_payload(&self, device: &Device) -> AssetPayload {
        AssetPayload::from_device(device, &CustomFieldMap::default())
    }
}

// ── Progress ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingProgress {
    fn begin(&self, platform: Platform, total: u64) {
        self.events.lock().unwrap().push(format!("begin:{platform}:{total}"));
    }

    fn advance(&self) {
        self.events.lock().unwrap().push("advance".to_string());
    }

    fn finish(&self, platform: Platform) {
        self.events.lock().unwrap().push(format!("finish:{platform}"));
    }
}
