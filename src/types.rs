/// Shared types used across the codebase

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Driver key as stored upstream; integer or text depending on the table definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DriverId {
    Int(i64),
    Text(String),
}

/// Listing projection of a driver row. Any other upstream columns are dropped on decode.
///
/// `full_name` is nullable upstream; a null or missing name decodes as `None` and is
/// rendered as `null`, so one incomplete row does not sink the whole listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    #[serde(default)]
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

impl Driver {
    pub const TABLE: &'static str = "drivers";
    pub const COLUMNS: [&'static str; 3] = ["id", "full_name", "phone"];
    pub const SORT_KEY: &'static str = "full_name";
}

/// Authenticated caller as reported by the gateway's auth subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

/// Stored-object metadata exactly as the blob subsystem returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobDescriptor(pub Value);

impl BlobDescriptor {
    /// Public locator, when the blob subsystem included one
    pub fn url(&self) -> Option<&str> {
        self.0.get("url").and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// Visibility sent with a blob write. Uploads are only ever stored publicly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobAccess {
    #[default]
    Public,
}

impl BlobAccess {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlobAccess::Public => "public",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobOptions {
    pub access: BlobAccess,
    pub content_type: Option<String>,
}

impl BlobOptions {
    pub fn public() -> Self {
        Self { access: BlobAccess::Public, content_type: None }
    }

    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }
}
