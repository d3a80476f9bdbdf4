//! Mapping between host item metadata and the remote repository schema.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

use crate::{
    error::{AdapterError, Result},
    model::{RemoteAdapterDescriptor, RemoteItemMetadata, RemoteRepositoryItem},
    types::{AdapterDescriptor, ItemMetadata, RepositoryItem, RepositorySettingDefinition, SettingType},
};

/// Host to remote. `modified_time` must be set.
///
/// Non-string extension values are rendered as JSON text, so they do not
/// survive a round trip as their original type.
pub fn metadata_to_remote(metadata: &ItemMetadata) -> Result<RemoteItemMetadata> {
    let modified_time = metadata
        .modified_time
        .ok_or_else(|| AdapterError::MissingField {
            field: "modifiedTime",
            item_location: metadata.item_location.clone(),
        })?;

    Ok(RemoteItemMetadata {
        item_location: metadata.item_location.clone(),
        name: metadata.name.clone(),
        title: metadata.title.clone(),
        size: metadata.size,
        created_time: metadata.created_time.map(format_timestamp),
        accessed_time: metadata.accessed_time.map(format_timestamp),
        modified_time: format_timestamp(modified_time),
        version: metadata.version.clone(),
        additional_metadata: metadata
            .additional_metadata
            .iter()
            .map(|(key, value)| (key.clone(), value_to_string(value)))
            .collect(),
    })
}

/// Remote to host
pub fn metadata_from_remote(remote: RemoteItemMetadata) -> Result<ItemMetadata> {
    Ok(ItemMetadata {
        created_time: remote
            .created_time
            .as_deref()
            .map(|value| parse_timestamp("createdTime", value))
            .transpose()?,
        accessed_time: remote
            .accessed_time
            .as_deref()
            .map(|value| parse_timestamp("accessedTime", value))
            .transpose()?,
        modified_time: Some(parse_timestamp("modifiedTime", &remote.modified_time)?),
        item_location: remote.item_location,
        name: remote.name,
        title: remote.title,
        size: remote.size,
        version: remote.version,
        additional_metadata: remote
            .additional_metadata
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect(),
    })
}

pub fn item_to_remote(item: &RepositoryItem) -> Result<RemoteRepositoryItem> {
    Ok(RemoteRepositoryItem {
        item_id: item.item_id.clone(),
        metadata: metadata_to_remote(&item.metadata)?,
    })
}

/// Every remote setting becomes a non-secret string setting
pub fn descriptor_from_remote(remote: RemoteAdapterDescriptor) -> AdapterDescriptor {
    AdapterDescriptor {
        adapter_type: remote.adapter_type,
        setting_definitions: remote
            .property_definition
            .into_iter()
            .map(|definition| RepositorySettingDefinition {
                name: definition.name,
                value_type: SettingType::String,
                is_required: definition.is_required,
                is_secret: false,
            })
            .collect(),
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// RFC 3339, or a bare local date-time read as UTC
fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| AdapterError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}
