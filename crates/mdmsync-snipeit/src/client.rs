//! Typed Snipe-IT operations used by the reconciliation driver.
//!
//! Every call goes through [`ResilientClient`], so a flaky Snipe-IT surfaces
//! as [`SnipeError::RetriesExhausted`] rather than a panic or a hang.

use crate::error::{SnipeError, SnipeResult};
use crate::http::{ApiResponse, ResilientClient};
use crate::image::ImageCatalog;
use crate::models::{Envelope, HardwareLookup, Listing, ModelRow, UserRow};
use crate::payload::{AssetPayload, CustomFieldMap};
use crate::retry::{RetryPolicy, Sleeper};
use mdmsync_core::{AssetId, Device, ModelId, Platform};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Snipe-IT status label id for "Ready to Deploy".
pub const READY_TO_DEPLOY_STATUS_ID: u64 = 2;

const MODEL_SEARCH_LIMIT: &str = "50";
const USER_SEARCH_LIMIT: &str = "10";

/// Category and fieldset ids for one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformIds {
    pub category_id: u64,
    pub fieldset_id: u64,
}

/// Everything needed to talk to one Snipe-IT instance.
#[derive(Debug, Clone)]
pub struct SnipeSettings {
    /// API root, e.g. `https://snipe.example.com/api/v1`.
    pub url: String,
    pub api_key: String,
    pub manufacturer_id: u64,
    pub mac: PlatformIds,
    pub ios: PlatformIds,
    pub tvos: PlatformIds,
    /// Requests allowed per rate window.
    pub rate_limit: u32,
    /// Look up model artwork on AppleDB.
    pub image_check: bool,
    pub fields: CustomFieldMap,
}

impl SnipeSettings {
    #[must_use]
    pub fn platform_ids(&self, platform: Platform) -> PlatformIds {
        match platform {
            Platform::Mac => self.mac,
            Platform::Ios => self.ios,
            Platform::Tvos => self.tvos,
        }
    }
}

/// Snipe-IT API client.
#[derive(Debug)]
pub struct SnipeClient {
    http: ResilientClient,
    settings: SnipeSettings,
    catalog: ImageCatalog,
}

impl SnipeClient {
    pub fn new(settings: SnipeSettings) -> SnipeResult<Self> {
        let http = ResilientClient::new(&settings.url, &settings.api_key, settings.rate_limit)?;
        Ok(Self {
            http,
            settings,
            catalog: ImageCatalog::default(),
        })
    }

    /// Create a client on top of an existing transport (for testing).
    #[must_use]
    pub fn with_transport(settings: SnipeSettings, http: ResilientClient) -> Self {
        Self {
            http,
            settings,
            catalog: ImageCatalog::default(),
        }
    }

    #[must_use]
    pub fn with_image_catalog(mut self, catalog: ImageCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.http = self.http.with_policy(policy);
        self
    }

    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.http = self.http.with_sleeper(sleeper);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &SnipeSettings {
        &self.settings
    }

    #[must_use]
    pub fn transport(&self) -> &ResilientClient {
        &self.http
    }

    // ── Hardware ──────────────────────────────────────────────────────

    /// `GET /hardware/byserial/{serial}`.
    ///
    /// A 404 or an error envelope means "no such asset" and yields an empty
    /// lookup.
    pub async fn find_asset_by_serial(&self, serial: &str) -> SnipeResult<HardwareLookup> {
        let response = self
            .http
            .get(&format!("/hardware/byserial/{serial}"), &[])
            .await?;
        if response.status == StatusCode::NOT_FOUND {
            debug!(serial, "Serial not found in Snipe-IT");
            return Ok(HardwareLookup::default());
        }
        response.error_for_status()?.json()
    }

    /// `POST /hardware`. Returns the new asset id.
    pub async fn create_asset(
        &self,
        model_id: ModelId,
        payload: AssetPayload,
    ) -> SnipeResult<AssetId> {
        let payload = payload.for_create(model_id, READY_TO_DEPLOY_STATUS_ID);
        info!(serial = ?payload.serial(), model_id = %model_id, "Creating Snipe-IT asset");
        let response = self.http.post("/hardware", Some(&payload.into_value())).await?;
        let envelope = accepted(response)?;
        envelope.payload_id().map(AssetId::new).ok_or_else(|| {
            SnipeError::Parse("asset create response carried no payload id".to_string())
        })
    }

    /// `PATCH /hardware/{id}`. The serial is stripped; `model_id` is
    /// re-asserted when given.
    pub async fn update_asset(
        &self,
        asset_id: AssetId,
        payload: AssetPayload,
        model_id: Option<ModelId>,
    ) -> SnipeResult<()> {
        let payload = payload.for_update(model_id);
        debug!(asset_id = %asset_id, "Updating Snipe-IT asset");
        let response = self
            .http
            .patch(&format!("/hardware/{asset_id}"), &payload.into_value())
            .await?;
        accepted(response).map(|_| ())
    }

    /// Build the hardware payload for `device` using this instance's field names.
    #[must_use]
    pub fn build_asset_payload(&self, device: &Device) -> AssetPayload {
        AssetPayload::from_device(device, &self.settings.fields)
    }

    // ── Models ────────────────────────────────────────────────────────

    /// Search models by name.
    ///
    /// Prefers an exact name or model-number match and falls back to the
    /// first row. When image lookup is enabled and the model has no image,
    /// one is fetched and patched onto the model (best effort).
    pub async fn find_model(&self, name: &str) -> SnipeResult<Option<ModelRow>> {
        let query = [
            ("limit", MODEL_SEARCH_LIMIT.to_string()),
            ("offset", "0".to_string()),
            ("search", name.to_string()),
            ("sort", "created_at".to_string()),
            ("order", "asc".to_string()),
        ];
        let listing: Listing<ModelRow> = self
            .http
            .get("/models", &query)
            .await?
            .error_for_status()?
            .json()?;

        let mut rows = listing.rows.into_iter();
        let first = rows.next();
        let model = match first {
            Some(first) if first.is_named(name) => Some(first),
            Some(first) => Some(rows.find(|row| row.is_named(name)).unwrap_or(first)),
            None => None,
        };

        let Some(model) = model else {
            debug!(name, "Model not found");
            return Ok(None);
        };

        if self.settings.image_check && !model.has_image() {
            self.backfill_model_image(&model, name).await;
        }
        Ok(Some(model))
    }

    async fn backfill_model_image(&self, model: &ModelRow, name: &str) {
        let Some(image) = self.catalog.image_for(name).await else {
            return;
        };
        info!(model_id = %model.id, name, "Setting missing model image");
        if let Err(e) = self.update_model(model.id, &json!({ "image": image })).await {
            warn!(model_id = %model.id, error = %e, "Failed to set model image");
        }
    }

    /// `POST /models` with the platform's category and fieldset.
    pub async fn create_model(&self, platform: Platform, name: &str) -> SnipeResult<ModelId> {
        let ids = self.settings.platform_ids(platform);
        let mut body = json!({
            "name": name,
            "model_number": name,
            "manufacturer_id": self.settings.manufacturer_id,
            "category_id": ids.category_id,
            "fieldset_id": ids.fieldset_id,
        });

        let image = if self.settings.image_check {
            self.catalog.image_for(name).await
        } else {
            None
        };
        match image {
            Some(image) => body["image"] = Value::String(image),
            None => debug!(name, "Creating model without image"),
        }

        info!(name, platform = %platform, "Creating Snipe-IT model");
        let response = self.http.post("/models", Some(&body)).await?;
        let envelope = accepted(response)?;
        envelope.payload_id().map(ModelId::new).ok_or_else(|| {
            SnipeError::Parse("model create response carried no payload id".to_string())
        })
    }

    /// `PATCH /models/{id}`.
    pub async fn update_model(&self, model_id: ModelId, body: &Value) -> SnipeResult<()> {
        let response = self
            .http
            .patch(&format!("/models/{model_id}"), body)
            .await?;
        accepted(response).map(|_| ())
    }

    // ── Users & assignment ────────────────────────────────────────────

    /// Find the user whose email equals `email`, ignoring case.
    pub async fn find_user_by_email(&self, email: &str) -> SnipeResult<Option<UserRow>> {
        let email = email.trim().to_lowercase();
        let query = [
            ("search", email.clone()),
            ("limit", USER_SEARCH_LIMIT.to_string()),
        ];
        let listing: Listing<UserRow> = self
            .http
            .get("/users", &query)
            .await?
            .error_for_status()?
            .json()?;

        Ok(listing.rows.into_iter().find(|user| {
            user.email
                .as_deref()
                .is_some_and(|e| e.trim().eq_ignore_ascii_case(&email))
        }))
    }

    /// Check `asset_id` out to the user with `email`.
    ///
    /// Returns `false` without touching the asset when no user has exactly
    /// that email.
    pub async fn assign_user(&self, email: &str, asset_id: AssetId) -> SnipeResult<bool> {
        let Some(user) = self.find_user_by_email(email).await? else {
            info!(email, asset_id = %asset_id, "No Snipe-IT user with this email, not assigning");
            return Ok(false);
        };

        info!(email, user_id = %user.id, asset_id = %asset_id, "Checking out asset");
        let body = json!({
            "assigned_user": user.id.get(),
            "checkout_to_type": "user",
        });
        let response = self
            .http
            .post(&format!("/hardware/{asset_id}/checkout"), Some(&body))
            .await?;
        accepted(response).map(|_| true)
    }

    /// Check `asset_id` back in, clearing any assignment.
    pub async fn unassign(&self, asset_id: AssetId) -> SnipeResult<()> {
        info!(asset_id = %asset_id, "Checking in asset");
        let response = self
            .http
            .post(&format!("/hardware/{asset_id}/checkin"), None)
            .await?;
        accepted(response).map(|_| ())
    }
}

/// Require a 2xx response whose envelope is not `"status": "error"`.
fn accepted(response: ApiResponse) -> SnipeResult<Envelope> {
    let response = response.error_for_status()?;
    let envelope: Envelope = response.json()?;
    if envelope.is_error() {
        return Err(SnipeError::Rejected(envelope.message_text()));
    }
    Ok(envelope)
}
