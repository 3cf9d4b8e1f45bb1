//! `settings.ini` loading and validation.
//!
//! The file is read with the `config` crate and validated up front; any
//! problem is fatal before the first run starts.

use config::{Config, File, FileFormat};
use mdmsync_core::Platform;
use mdmsync_mosyle::{ListMode, MosyleSettings};
use mdmsync_snipeit::client::PlatformIds;
use mdmsync_snipeit::{CustomFieldMap, SnipeSettings};
use mdmsync_sync::SyncOptions;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

const MOSYLE: &str = "mosyle";
const SNIPE: &str = "snipe-it";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read settings: {0}")]
    Read(#[from] config::ConfigError),

    #[error("missing [{0}] section")]
    MissingSection(&'static str),

    #[error("missing required setting '{key}' in [{section}]")]
    Missing { section: &'static str, key: String },

    #[error("invalid setting '{key}' in [{section}]: {message}")]
    Invalid {
        section: &'static str,
        key: String,
        message: String,
    },
}

/// Validated configuration for every run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub mosyle: MosyleSettings,
    pub snipe: SnipeSettings,
    pub sync: SyncOptions,
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(default)]
    mosyle: Option<HashMap<String, String>>,
    #[serde(default, rename = "snipe-it")]
    snipe: Option<HashMap<String, String>>,
    #[serde(default)]
    fields: Option<CustomFieldMap>,
}

/// One INI section with case-insensitive key lookup.
struct Section {
    name: &'static str,
    values: HashMap<String, String>,
}

impl Section {
    fn new(name: &'static str, raw: Option<HashMap<String, String>>) -> Result<Self, SettingsError> {
        let raw = raw.ok_or(SettingsError::MissingSection(name))?;
        let values = raw
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.trim().to_string()))
            .collect();
        Ok(Self { name, values })
    }

    fn optional(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<&str, SettingsError> {
        self.optional(key).ok_or_else(|| SettingsError::Missing {
            section: self.name,
            key: key.to_string(),
        })
    }

    fn parse<T>(&self, key: &str, value: &str) -> Result<T, SettingsError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        value.parse().map_err(|e: T::Err| self.invalid(key, e.to_string()))
    }

    fn id(&self, key: &str) -> Result<u64, SettingsError> {
        self.parse(key, self.required(key)?)
    }

    fn invalid(&self, key: &str, message: impl Into<String>) -> SettingsError {
        SettingsError::Invalid {
            section: self.name,
            key: key.to_string(),
            message: message.into(),
        }
    }

    fn flag(&self, key: &str, default: bool) -> Result<bool, SettingsError> {
        let Some(value) = self.optional(key) else {
            return Ok(default);
        };
        match value.to_ascii_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(true),
            "0" | "no" | "false" | "off" => Ok(false),
            other => Err(self.invalid(key, format!("'{other}' is not a boolean"))),
        }
    }
}

impl Settings {
    /// Load and validate the INI file at `path`.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.is_file() {
            return Err(SettingsError::NotFound(path.to_path_buf()));
        }
        let raw: RawSettings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini))
            .build()?
            .try_deserialize()?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, SettingsError> {
        let mosyle = Section::new(MOSYLE, raw.mosyle)?;
        let snipe = Section::new(SNIPE, raw.snipe)?;

        let mosyle_settings = MosyleSettings {
            url: mosyle.required("url")?.to_string(),
            token: mosyle.required("token")?.to_string(),
            user: mosyle.required("user")?.to_string(),
            password: mosyle.required("password")?.to_string(),
        };

        let platforms = Platform::parse_list(mosyle.required("deviceTypes")?)
            .map_err(|e| mosyle.invalid("deviceTypes", e.to_string()))?;
        if platforms.is_empty() {
            return Err(mosyle.invalid("deviceTypes", "no device types listed"));
        }
        let list_mode = match mosyle.optional("calltype") {
            Some(value) => mosyle.parse::<ListMode>("calltype", value)?,
            None => ListMode::All,
        };

        let rate_limit: u32 = snipe.parse("rate_limit", snipe.required("rate_limit")?)?;
        if rate_limit == 0 {
            return Err(snipe.invalid("rate_limit", "must be greater than zero"));
        }

        let snipe_settings = SnipeSettings {
            url: snipe.required("url")?.to_string(),
            api_key: snipe.required("apiKey")?.to_string(),
            manufacturer_id: snipe.id("manufacturer_id")?,
            mac: PlatformIds {
                category_id: snipe.id("macos_category_id")?,
                fieldset_id: snipe.id("macos_fieldset_id")?,
            },
            ios: PlatformIds {
                category_id: snipe.id("ios_category_id")?,
                fieldset_id: snipe.id("ios_fieldset_id")?,
            },
            tvos: PlatformIds {
                category_id: snipe.id("tvos_category_id")?,
                fieldset_id: snipe.id("tvos_fieldset_id")?,
            },
            rate_limit,
            image_check: snipe.flag("apple_image_check", false)?,
            fields: raw.fields.unwrap_or_default(),
        };

        Ok(Self {
            mosyle: mosyle_settings,
            snipe: snipe_settings,
            sync: SyncOptions {
                platforms,
                list_mode,
                ..SyncOptions::default()
            },
        })
    }
}
