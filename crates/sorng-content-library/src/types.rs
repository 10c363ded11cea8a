//! Wire types for the vSphere content library REST API.

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Libraries
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LibraryType {
    Local,
    Subscribed,
    #[serde(other)]
    Unknown,
}

impl Default for LibraryType {
    fn default() -> Self { Self::Local }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StorageBackingType {
    Datastore,
    Other,
    #[serde(other)]
    Unknown,
}

/// Where a library keeps its content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageBacking {
    #[serde(rename = "type")]
    pub backing_type: StorageBackingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datastore_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_uri: Option<String>,
}

impl StorageBacking {
    pub fn datastore(datastore_id: impl Into<String>) -> Self {
        Self {
            backing_type: StorageBackingType::Datastore,
            datastore_id: Some(datastore_id.into()),
            storage_uri: None,
        }
    }
}

/// Content library (GET /api/content/library/{id}, and the create spec).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Library {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "type", default)]
    pub library_type: LibraryType,
    #[serde(default)]
    pub storage_backings: Vec<StorageBacking>,
}

impl Library {
    /// Remote identifier, or an empty string for an unsaved spec.
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

/// Body of `POST /api/content/library?action=find`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindLibrarySpec {
    pub name: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Library items
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Library item (GET /api/content/library/item/{id}, and the create spec).
///
/// A spec carrying `id` is an in-place metadata update of that item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub library_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Item type tag (e.g. "ovf", "iso"); empty leaves it to the server.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub item_type: String,
}

impl LibraryItem {
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }
}

/// Body of `POST /api/content/library/item?action=find`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindItemSpec {
    pub library_id: String,
    pub name: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Update sessions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSessionCreateSpec {
    pub library_item_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateSessionState {
    Active,
    Done,
    Error,
    Canceled,
    #[serde(other)]
    Unknown,
}

/// vSphere localizable message; only the default text is kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalizableMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub default_message: String,
}

/// GET /api/content/library/item/update-session/{id}.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateSessionInfo {
    #[serde(default)]
    pub library_item_id: String,
    pub state: UpdateSessionState,
    #[serde(default)]
    pub client_progress: i64,
    #[serde(default)]
    pub error_message: Option<LocalizableMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    Pull,
    Push,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferEndpoint {
    pub uri: String,
}

/// Body of `POST .../updatesession/file/{session}?action=add`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddFileSpec {
    pub name: String,
    pub source_type: SourceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_endpoint: Option<TransferEndpoint>,
}

impl AddFileSpec {
    /// Register `uri` by reference; the server pulls the content itself.
    pub fn pull(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_type: SourceType::Pull,
            source_endpoint: Some(TransferEndpoint { uri: uri.into() }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    WaitingForTransfer,
    Transferring,
    Ready,
    Validating,
    Error,
    #[serde(other)]
    Unknown,
}

/// One file registered in an update session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateSessionFile {
    pub name: String,
    pub status: TransferStatus,
    #[serde(default)]
    pub error_message: Option<LocalizableMessage>,
}
