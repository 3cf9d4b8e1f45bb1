//! The two remote systems as seen by the reconciliation driver.
//!
//! The driver only talks to these traits, so tests can drive it with
//! in-memory fakes while the binary plugs in [`MosyleClient`] and
//! [`SnipeClient`].

use crate::error::SyncResult;
use async_trait::async_trait;
use mdmsync_core::{AssetId, Device, ModelId, Platform};
use mdmsync_mosyle::{DeviceQuery, MosyleClient};
use mdmsync_snipeit::{AssetPayload, HardwareLookup, ModelRow, SnipeClient};

/// Source of device inventory (the MDM).
#[async_trait]
pub trait DeviceSource: Send + Sync {
    async fn list_devices(&self, platform: Platform, query: &DeviceQuery)
        -> SyncResult<Vec<Device>>;

    /// Write `tag` onto the MDM record for `serial`.
    async fn set_asset_tag(&self, serial: &str, tag: &str) -> SyncResult<()>;
}

/// Destination asset inventory (the ITAM).
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn find_asset_by_serial(&self, serial: &str) -> SyncResult<HardwareLookup>;

    async fn find_model(&self, name: &str) -> SyncResult<Option<ModelRow>>;

    async fn create_model(&self, platform: Platform, name: &str) -> SyncResult<ModelId>;

    async fn create_asset(&self, model_id: ModelId, payload: AssetPayload) -> SyncResult<AssetId>;

    async fn update_asset(
        &self,
        asset_id: AssetId,
        payload: AssetPayload,
        model_id: Option<ModelId>,
    ) -> SyncResult<()>;

    /// Returns `false` when no user has exactly this email.
    async fn assign_user(&self, email: &str, asset_id: AssetId) -> SyncResult<bool>;

    async fn unassign(&self, asset_id: AssetId) -> SyncResult<()>;

    fn build_asset_payload(&self, device: &Device) -> AssetPayload;
}

#[async_trait]
impl DeviceSource for MosyleClient {
    async fn list_devices(
        &self,
        platform: Platform,
        query: &DeviceQuery,
    ) -> SyncResult<Vec<Device>> {
        Ok(MosyleClient::list_devices(self, platform, query).await?)
    }

    async fn set_asset_tag(&self, serial: &str, tag: &str) -> SyncResult<()> {
        Ok(MosyleClient::set_asset_tag(self, serial, tag).await?)
    }
}

#[async_trait]
impl AssetStore for SnipeClient {
    async fn find_asset_by_serial(&self, serial: &str) -> SyncResult<HardwareLookup> {
        Ok(SnipeClient::find_asset_by_serial(self, serial).await?)
    }

    async fn find_model(&self, name: &str) -> SyncResult<Option<ModelRow>> {
        Ok(SnipeClient::find_model(self, name).await?)
    }

    async fn create_model(&self, platform: Platform, name: &str) -> SyncResult<ModelId> {
        Ok(SnipeClient::create_model(self, platform, name).await?)
    }

    async fn create_asset(&self, model_id: ModelId, payload: AssetPayload) -> SyncResult<AssetId> {
        Ok(SnipeClient::create_asset(self, model_id, payload).await?)
    }

    async fn update_asset(
        &self,
        asset_id: AssetId,
        payload: AssetPayload,
        model_id: Option<ModelId>,
    ) -> SyncResult<()> {
        Ok(SnipeClient::update_asset(self, asset_id, payload, model_id).await?)
    }

    async fn assign_user(&self, email: &str, asset_id: AssetId) -> SyncResult<bool> {
        Ok(SnipeClient::assign_user(self, email, asset_id).await?)
    }

    async fn unassign(&self, asset_id: AssetId) -> SyncResult<()> {
        Ok(SnipeClient::unassign(self, asset_id).await?)
    }

    fn build_asset_payload(&self, device: &Device) -> AssetPayload {
        SnipeClient::build_asset_payload(self, device)
    }
}
