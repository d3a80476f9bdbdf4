//! Wire schema of the remote repository service.
//!
//! Kept separate from the host types in [`crate::types`]; [`crate::translate`]
//! maps between the two.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::PartitionHint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteItemMetadata {
    pub item_location: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessed_time: Option<String>,
    pub modified_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub additional_metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSettingDefinition {
    pub name: String,
    #[serde(default)]
    pub is_required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAdapterDescriptor {
    pub adapter_type: String,
    #[serde(default)]
    pub property_definition: Vec<RemoteSettingDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRepositoryProperties {
    pub configuration_options: HashMap<String, String>,
    pub repository_options: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFailureDetails {
    pub item_location: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListRequest {
    pub additional_filter: Option<String>,
    pub repository_properties: RemoteRepositoryProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListItem {
    pub item_metadata: RemoteItemMetadata,
    #[serde(default)]
    pub partition_hint: Option<PartitionHint>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    #[serde(default)]
    pub failures: Vec<RemoteFailureDetails>,
    #[serde(default)]
    pub items: Vec<FileListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRepositoryItem {
    pub item_id: String,
    pub metadata: RemoteItemMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDataRequest {
    pub repository_properties: RemoteRepositoryProperties,
    pub items: Vec<RemoteRepositoryItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDataItem {
    pub item_id: String,
    /// Base64 encoded payload
    pub file_contents: String,
    pub metadata: RemoteItemMetadata,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDataResponse {
    #[serde(default)]
    pub failures: Vec<RemoteFailureDetails>,
    #[serde(default)]
    pub items: Vec<FileDataItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_wire_names() {
        let body = r#"{
            "failures": [{ "itemLocation": "/a", "message": "denied" }],
            "items": [{
                "itemMetadata": {
                    "itemLocation": "/b",
                    "name": "b.txt",
                    "modifiedTime": "2024-03-01T10:00:00Z",
                    "additionalMetadata": { "owner": "ops" }
                },
                "partitionHint": "p1"
            }]
        }"#;

        let response: FileListResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.failures[0].item_location, "/a");
        let item = &response.items[0];
        assert_eq!(item.item_metadata.name, "b.txt");
        assert_eq!(item.item_metadata.additional_metadata["owner"], "ops");
        assert_eq!(item.partition_hint, Some(PartitionHint("p1".to_string())));
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let response: FileDataResponse = serde_json::from_str("{}").unwrap();
        assert!(response.failures.is_empty());
        assert!(response.items.is_empty());

        let metadata: RemoteItemMetadata = serde_json::from_str(
            r#"{ "itemLocation": "/x", "name": "x", "modifiedTime": "2024-01-01T00:00:00Z" }"#,
        )
        .unwrap();
        assert!(metadata.additional_metadata.is_empty());
        assert_eq!(metadata.size, None);
    }

    #[test]
    fn test_descriptor_wire_names() {
        let descriptor: RemoteAdapterDescriptor = serde_json::from_str(
            r#"{ "adapterType": "Rest", "propertyDefinition": [{ "name": "url", "isRequired": true }] }"#,
        )
        .unwrap();
        assert_eq!(descriptor.adapter_type, "Rest");
        assert!(descriptor.property_definition[0].is_required);
    }
}
