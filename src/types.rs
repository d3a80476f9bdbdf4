use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::options::OptionsProvider;

/// Host-side description of one repository item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    /// Stable locator, valid across list and fetch
    pub item_location: String,
    pub name: String,
    pub title: Option<String>,
    /// Size in bytes
    pub size: Option<u64>,
    pub created_time: Option<DateTime<Utc>>,
    pub accessed_time: Option<DateTime<Utc>>,
    /// Required when the item is sent back to the remote repository
    pub modified_time: Option<DateTime<Utc>>,
    pub version: Option<String>,
    /// Extension attributes; values are loosely typed
    #[serde(default)]
    pub additional_metadata: HashMap<String, serde_json::Value>,
}

impl ItemMetadata {
    pub fn new(name: impl Into<String>, item_location: impl Into<String>) -> Self {
        Self {
            item_location: item_location.into(),
            name: name.into(),
            title: None,
            size: None,
            created_time: None,
            accessed_time: None,
            modified_time: None,
            version: None,
            additional_metadata: HashMap::new(),
        }
    }
}

/// An item previously listed, addressed by the fetch-phase handle `item_id`
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryItem {
    pub item_id: String,
    pub metadata: ItemMetadata,
}

/// Why a single item could not be listed or fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetails {
    pub message: String,
}

impl FailureDetails {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Opaque routing token attached to a listed item; never interpreted here
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionHint(pub String);

impl fmt::Display for PartitionHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two option sets describing how to reach the remote repository
#[derive(Clone)]
pub struct RepositoryProperties {
    pub configuration_options: Arc<dyn OptionsProvider>,
    pub repository_options: Arc<dyn OptionsProvider>,
}

impl fmt::Debug for RepositoryProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryProperties")
            .field("configuration_options", &self.configuration_options.option_names())
            .field("repository_options", &self.repository_options.option_names())
            .finish()
    }
}

/// Request for the list phase
#[derive(Debug, Clone)]
pub struct RetrieveFileListRequest {
    /// Passed through to the remote repository untouched
    pub additional_filter: Option<String>,
    pub repository_properties: RepositoryProperties,
}

/// Request for the fetch phase
#[derive(Debug, Clone)]
pub struct RetrieveFilesDataRequest {
    pub repository_properties: RepositoryProperties,
    pub items: Vec<RepositoryItem>,
}

/// Value type of a repository setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    String,
}

/// One setting the hosting engine must supply to this adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySettingDefinition {
    pub name: String,
    pub value_type: SettingType,
    pub is_required: bool,
    pub is_secret: bool,
}

/// Static capability description of the adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterDescriptor {
    pub adapter_type: String,
    pub setting_definitions: Vec<RepositorySettingDefinition>,
}

/// Decoded item contents, consumed exactly once
#[derive(Debug)]
pub struct FileContents {
    data: Bytes,
}

impl FileContents {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Decode a standard base64 payload; whitespace anywhere in it is ignored
    pub fn from_base64(encoded: &str) -> std::result::Result<Self, base64::DecodeError> {
        let compact: Vec<u8> = encoded
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        Ok(Self::new(STANDARD.decode(compact)?))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Stream the contents through `tokio::io::AsyncRead`
    pub fn into_reader(self) -> Cursor<Bytes> {
        Cursor::new(self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[test]
    fn test_file_contents_from_base64() {
        let contents = FileContents::from_base64("aGVsbG8=").unwrap();
        assert_eq!(contents.len(), 5);
        assert_eq!(contents.into_bytes(), Bytes::from_static(b"hello"));
    }

    #[test]
    fn test_file_contents_rejects_malformed_base64() {
        assert!(FileContents::from_base64("not base64!").is_err());
    }

    #[test]
    fn test_file_contents_ignores_embedded_whitespace() {
        let contents = FileContents::from_base64("aGVs\r\nbG8=").unwrap();
        assert_eq!(contents.into_bytes(), Bytes::from_static(b"hello"));

        let contents = FileContents::from_base64(" aGVs bG8=\n").unwrap();
        assert_eq!(contents.into_bytes(), Bytes::from_static(b"hello"));
    }

    #[test]
    fn test_empty_payload() {
        let contents = FileContents::from_base64("").unwrap();
        assert!(contents.is_empty());
    }

    #[tokio::test]
    async fn test_file_contents_reader() {
        let mut reader = FileContents::new(&b"hello"[..]).into_reader();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, b"hello");
    }

    #[test]
    fn test_partition_hint_is_transparent() {
        let hint: PartitionHint = serde_json::from_str("\"shard-7\"").unwrap();
        assert_eq!(hint, PartitionHint("shard-7".to_string()));
        assert_eq!(hint.to_string(), "shard-7");
    }
}
