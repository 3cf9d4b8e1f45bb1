//! Mosyle Manager HTTP client.

use crate::error::{MosyleError, MosyleResult};
use crate::models::{DeviceList, DeviceQuery, Envelope};
use mdmsync_core::{Device, Platform};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const ACCESS_TOKEN_HEADER: &str = "accessToken";

/// Mosyle connection settings.
#[derive(Clone)]
pub struct MosyleSettings {
    /// API root, e.g. `https://managerapi.mosyle.com/v2`.
    pub url: String,
    /// Access token issued for the API integration.
    pub token: String,
    /// Admin email used to log in.
    pub user: String,
    pub password: String,
}

impl fmt::Debug for MosyleSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MosyleSettings")
            .field("url", &self.url)
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Authenticated Mosyle client.
#[derive(Debug)]
pub struct MosyleClient {
    settings: MosyleSettings,
    http_client: Client,
    jwt: String,
}

impl MosyleClient {
    /// Log in and return a client bound to the issued session token.
    #[instrument(skip(settings), fields(url = %settings.url, user = %settings.user))]
    pub async fn login(settings: MosyleSettings) -> MosyleResult<Self> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("mdmsync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let body = json!({
            "accessToken": settings.token,
            "email": settings.user,
            "password": settings.password,
        });
        let response = http_client
            .post(endpoint(&settings.url, "login"))
            .header(ACCESS_TOKEN_HEADER, &settings.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MosyleError::Auth(format!(
                "login returned HTTP {status}: {body}"
            )));
        }

        let jwt = response
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                MosyleError::Auth("login response carried no Authorization header".to_string())
            })?
            .to_string();

        info!("Logged in to Mosyle");
        Ok(Self::with_jwt(settings, jwt, http_client))
    }

    /// Build a client around an already issued session token.
    #[must_use]
    pub fn with_jwt(settings: MosyleSettings, jwt: impl Into<String>, http_client: Client) -> Self {
        Self {
            settings,
            http_client,
            jwt: jwt.into(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &MosyleSettings {
        &self.settings
    }

    async fn call<T: DeserializeOwned>(&self, path: &str, mut body: Value) -> MosyleResult<Envelope<T>> {
        body["accessToken"] = Value::String(self.settings.token.clone());
        let response = self
            .http_client
            .post(endpoint(&self.settings.url, path))
            .header(ACCESS_TOKEN_HEADER, &self.settings.token)
            .header(AUTHORIZATION, &self.jwt)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(MosyleError::Api {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn list(&self, options: Value) -> MosyleResult<Vec<Device>> {
        let envelope: Envelope<DeviceList> =
            self.call("listdevices", json!({ "options": options })).await?;
        if !envelope.is_ok() {
            return Err(MosyleError::Rejected(envelope.describe()));
        }
        Ok(envelope.response.unwrap_or_default().devices)
    }

    /// One page of devices for `platform`. Pages start at 1.
    pub async fn list_page(&self, platform: Platform, page: u32) -> MosyleResult<Vec<Device>> {
        self.list(json!({ "os": platform.as_str(), "page": page }))
            .await
    }

    /// Every device for `platform`, paging until the first empty page.
    ///
    /// A rejected first page fails the listing. A rejected later page ends it
    /// and keeps the devices already fetched.
    #[instrument(skip_all, fields(platform = %platform))]
    pub async fn list_all(&self, platform: Platform) -> MosyleResult<Vec<Device>> {
        let mut devices = Vec::new();
        let mut page = 1;
        loop {
            let batch = match self.list_page(platform, page).await {
                Ok(batch) => batch,
                Err(MosyleError::Rejected(reason)) if page > 1 => {
                    debug!(page, reason = %reason, "Device listing ended on a rejected page");
                    break;
                }
                Err(e) => return Err(e),
            };
            if batch.is_empty() {
                break;
            }
            debug!(page, count = batch.len(), "Fetched device page");
            devices.extend(batch);
            page += 1;
        }
        Ok(devices)
    }

    /// Devices of `platform` modified between `start` and `end` (Unix seconds).
    pub async fn list_since(
        &self,
        platform: Platform,
        start: i64,
        end: i64,
    ) -> MosyleResult<Vec<Device>> {
        debug!(platform = %platform, start, end, "Listing modified devices");
        self.list(json!({ "os": platform.as_str(), "start": start, "end": end }))
            .await
    }

    pub async fn list_devices(
        &self,
        platform: Platform,
        query: &DeviceQuery,
    ) -> MosyleResult<Vec<Device>> {
        match *query {
            DeviceQuery::All => self.list_all(platform).await,
            DeviceQuery::Modified { start, end } => self.list_since(platform, start, end).await,
        }
    }

    /// Store `tag` as the asset tag of the device with `serial`.
    pub async fn set_asset_tag(&self, serial: &str, tag: &str) -> MosyleResult<()> {
        let body = json!({
            "elements": [{ "serialnumber": serial, "asset_tag": tag }],
        });
        let envelope: Envelope<Value> = self.call("devices", body).await?;
        if !envelope.is_ok() {
            return Err(MosyleError::Rejected(envelope.describe()));
        }
        debug!(serial, tag, "Asset tag stored in Mosyle");
        Ok(())
    }
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{path}", base.trim_end_matches('/'))
}
