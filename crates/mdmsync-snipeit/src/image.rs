//! Best-effort model artwork from the public AppleDB catalog.
//!
//! The catalog index is fetched once per [`ImageCatalog`] and reused for every
//! later lookup. A failed fetch is remembered too, so an unreachable catalog
//! costs one timeout per run. Every failure (network, parse, missing entry, missing image)
//! is logged and reported as "no image"; it never fails a sync.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

pub const DEFAULT_INDEX_URL: &str = "https://api.appledb.dev/device/main.json";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://img.appledb.dev";

const IMAGE_TIMEOUT: Duration = Duration::from_secs(5);
const INDEX_TIMEOUT: Duration = Duration::from_secs(60);
const FALLBACK_COLOR: &str = "Silver";

/// One entry of the AppleDB device index.
#[derive(Debug, Clone, Default, Deserialize)]
struct CatalogDevice {
    #[serde(default)]
    name: Value,
    #[serde(default)]
    identifier: Value,
    #[serde(default, rename = "deviceMap")]
    device_map: Value,
    #[serde(default, rename = "imageKey")]
    image_key: Value,
    #[serde(default)]
    key: Value,
    #[serde(default)]
    colors: Value,
}

fn value_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s == needle,
        Value::Array(items) => items.iter().any(|v| v.as_str() == Some(needle)),
        _ => false,
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

impl CatalogDevice {
    fn matches(&self, model: &str) -> bool {
        value_contains(&self.device_map, model) || value_contains(&self.identifier, model)
    }

    fn image_key<'a>(&'a self, model: &'a str) -> &'a str {
        non_empty_str(&self.image_key)
            .or_else(|| non_empty_str(&self.key))
            .unwrap_or(model)
    }

    fn color(&self) -> &str {
        self.colors
            .as_array()
            .and_then(|colors| colors.first())
            .and_then(|first| first.get("key"))
            .and_then(non_empty_str)
            .unwrap_or(FALLBACK_COLOR)
    }
}

/// AppleDB lookup client.
#[derive(Debug)]
pub struct ImageCatalog {
    index_url: String,
    image_base_url: String,
    http_client: Client,
    index: OnceCell<Option<Vec<CatalogDevice>>>,
}

impl Default for ImageCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_URL, DEFAULT_IMAGE_BASE_URL)
    }
}

impl ImageCatalog {
    #[must_use]
    pub fn new(index_url: &str, image_base_url: &str) -> Self {
        Self {
            index_url: index_url.to_string(),
            image_base_url: image_base_url.trim_end_matches('/').to_string(),
            http_client: Client::new(),
            index: OnceCell::new(),
        }
    }

    /// Candidate image URLs, most specific first.
    fn candidate_urls(&self, key: &str, color: &str) -> [String; 4] {
        let base = &self.image_base_url;
        [
            format!("{base}/device@256/{key}/{color}.png"),
            format!("{base}/device/{key}/{color}.png"),
            format!("{base}/device@256/{key}.png"),
            format!("{base}/device/{key}.png"),
        ]
    }

    async fn fetch_index(&self) -> Result<Vec<CatalogDevice>, reqwest::Error> {
        debug!(url = %self.index_url, "Fetching AppleDB device index");
        self.http_client
            .get(&self.index_url)
            .timeout(INDEX_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    async fn load_index(&self) -> Option<&[CatalogDevice]> {
        self.index
            .get_or_init(|| async {
                match self.fetch_index().await {
                    Ok(devices) => {
                        info!(devices = devices.len(), "Loaded AppleDB device index");
                        Some(devices)
                    }
                    Err(e) => {
                        warn!(error = %e, "AppleDB index unavailable, model images disabled");
                        None
                    }
                }
            })
            .await
            .as_deref()
    }

    /// Look up an image for a model identifier such as `MacBookPro18,1`.
    ///
    /// Returns a `data:` URL suitable for the Snipe-IT `image` field.
    pub async fn image_for(&self, model: &str) -> Option<String> {
        let Some(index) = self.load_index().await else {
            debug!(model, "Skipping image lookup, no AppleDB index");
            return None;
        };

        let Some(device) = index.iter().find(|d| d.matches(model)) else {
            debug!(model, "No AppleDB entry for model");
            return None;
        };

        let key = device.image_key(model);
        let color = device.color();
        debug!(model, name = %device.name, key, color, "Found AppleDB entry");

        for url in self.candidate_urls(key, color) {
            match self.fetch_image(&url).await {
                Ok(Some(bytes)) => {
                    info!(model, url = %url, "Fetched model image");
                    return Some(format!(
                        "data:image/png;name=image.png;base64,{}",
                        BASE64.encode(bytes)
                    ));
                }
                Ok(None) => debug!(url = %url, "Image not found"),
                Err(e) => debug!(url = %url, error = %e, "Image fetch failed"),
            }
        }

        warn!(model, "No image URL worked for model");
        None
    }

    async fn fetch_image(&self, url: &str) -> Result<Option<Vec<u8>>, reqwest::Error> {
        let response = self
            .http_client
            .get(url)
            .timeout(IMAGE_TIMEOUT)
            .send()
            .await?;
        if response.status() != StatusCode::OK {
            return Ok(None);
        }
        Ok(Some(response.bytes().await?.to_vec()))
    }
}
