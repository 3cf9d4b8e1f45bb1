//! Snipe-IT response shapes.
//!
//! Only the fields the sync reads are modelled; everything else in the
//! Snipe-IT payloads is ignored.

use mdmsync_core::{AssetId, ModelId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Generic `{ "total": n, "rows": [...] }` listing.
///
/// Snipe-IT answers some lookups with an error envelope instead of a listing,
/// so both fields default to empty.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Listing<T> {
    #[serde(default)]
    pub total: u64,
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            total: 0,
            rows: Vec::new(),
        }
    }
}

/// Result of `GET /hardware/byserial/{serial}`.
pub type HardwareLookup = Listing<HardwareRow>;

/// One hardware (asset) record.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HardwareRow {
    pub id: AssetId,
    #[serde(default)]
    pub asset_tag: Option<String>,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<Assignee>,
}

impl HardwareRow {
    /// Current asset tag, if non-blank.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.asset_tag
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Who an asset is checked out to.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Assignee {
    pub id: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl Assignee {
    /// Whether this assignee is the user with `email`.
    ///
    /// Compares against the assignee's email, falling back to the username
    /// (Snipe-IT installs commonly use the email as username).
    #[must_use]
    pub fn matches_email(&self, email: &str) -> bool {
        let email = email.trim();
        self.email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .or(self.username.as_deref())
            .is_some_and(|candidate| candidate.trim().eq_ignore_ascii_case(email))
    }

    /// Human-readable identity for log lines.
    #[must_use]
    pub fn display(&self) -> &str {
        self.email
            .as_deref()
            .or(self.username.as_deref())
            .or(self.name.as_deref())
            .unwrap_or("<unknown>")
    }
}

/// One model record.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelRow {
    pub id: ModelId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model_number: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl ModelRow {
    /// Case-insensitive match on name or model number.
    #[must_use]
    pub fn is_named(&self, query: &str) -> bool {
        [self.name.as_deref(), self.model_number.as_deref()]
            .into_iter()
            .flatten()
            .any(|candidate| candidate.trim().eq_ignore_ascii_case(query.trim()))
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image.as_deref().is_some_and(|i| !i.is_empty())
    }
}

/// One user record from `GET /users`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserRow {
    pub id: UserId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Mutation envelope: `{ "status": "success"|"error", "messages": ..., "payload": ... }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub messages: Value,
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }

    /// `messages` flattened to a single line.
    #[must_use]
    pub fn message_text(&self) -> String {
        match &self.messages {
            Value::String(s) => s.clone(),
            Value::Null => "no message".to_string(),
            other => other.to_string(),
        }
    }

    /// Numeric `payload.id`, if present.
    #[must_use]
    pub fn payload_id(&self) -> Option<u64> {
        self.payload.get("id").and_then(Value::as_u64)
    }
}
