use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    api::AdapterApi,
    config::AdapterSettings,
    error::{AdapterError, Result},
    model::{FileDataRequest, FileDataResponse, FileListRequest, FileListResponse, RemoteAdapterDescriptor},
};

/// HTTP client for the remote repository service
///
/// Endpoints, relative to the base path:
/// - `GET adapterDescriptor`
/// - `POST retrieveFileList`
/// - `POST retrieveFilesData`
#[derive(Debug, Clone)]
pub struct HttpAdapterApi {
    client: Client,
    base_path: String,
}

impl HttpAdapterApi {
    /// Create a client with default HTTP settings
    pub fn new(base_path: impl Into<String>) -> Result<Self> {
        let settings = AdapterSettings::new(base_path);
        Ok(Self::with_client(settings.build_client()?, settings.base_path))
    }

    pub fn with_client(client: Client, base_path: impl Into<String>) -> Self {
        Self {
            client,
            base_path: base_path.into(),
        }
    }

    /// Build a client from validated settings, including any proxy
    pub fn from_settings(settings: &AdapterSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::with_client(settings.build_client()?, settings.base_path.clone()))
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Join the base path with an endpoint name
    fn endpoint(&self, name: &str) -> String {
        format!(
            "{}/{}",
            self.base_path.trim_end_matches('/'),
            name.trim_start_matches('/')
        )
    }

    async fn read_json<T: DeserializeOwned>(url: &str, response: Response) -> Result<T> {
        match response.status() {
            status if status.is_success() => {
                let body = response.bytes().await?;
                debug!(url = %url, bytes = body.len(), "Remote repository responded");
                Ok(serde_json::from_slice(&body)?)
            }
            status => {
                let message = response
                    .text()
                    .await
                    .ok()
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| default_message(status));
                Err(AdapterError::Remote {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

fn default_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unexpected status")
        .to_string()
}

#[async_trait]
impl AdapterApi for HttpAdapterApi {
    async fn adapter_descriptor(&self) -> Result<RemoteAdapterDescriptor> {
        let url = self.endpoint("adapterDescriptor");
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;
        Self::read_json(&url, response).await
    }

    async fn retrieve_file_list(&self, request: FileListRequest) -> Result<FileListResponse> {
        let url = self.endpoint("retrieveFileList");
        let response = self.client.post(&url).json(&request).send().await?;
        Self::read_json(&url, response).await
    }

    async fn retrieve_files_data(&self, request: FileDataRequest) -> Result<FileDataResponse> {
        let url = self.endpoint("retrieveFilesData");
        let response = self.client.post(&url).json(&request).send().await?;
        Self::read_json(&url, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RemoteItemMetadata, RemoteRepositoryItem, RemoteRepositoryProperties};
    use mockito::{Matcher, Server};
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn properties() -> RemoteRepositoryProperties {
        RemoteRepositoryProperties {
            configuration_options: [("mode".to_string(), "full".to_string())].into(),
            repository_options: [("root".to_string(), "/srv".to_string())].into(),
        }
    }

    #[test]
    fn test_endpoint_join() {
        let api = HttpAdapterApi::new("http://host/api/").unwrap();
        assert_eq!(api.endpoint("retrieveFileList"), "http://host/api/retrieveFileList");

        let api = HttpAdapterApi::new("http://host").unwrap();
        assert_eq!(api.endpoint("/adapterDescriptor"), "http://host/adapterDescriptor");
    }

    #[tokio::test]
    async fn test_adapter_descriptor() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/adapterDescriptor")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"adapterType":"Rest","propertyDefinition":[{"name":"url","isRequired":true}]}"#)
            .create_async()
            .await;
        let api = HttpAdapterApi::new(format!("{}/api", server.url())).unwrap();

        let descriptor = api.adapter_descriptor().await.unwrap();

        mock.assert_async().await;
        assert_eq!(descriptor.adapter_type, "Rest");
        assert_eq!(descriptor.property_definition.len(), 1);
    }

    #[tokio::test]
    async fn test_retrieve_file_list_sends_camel_case_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/retrieveFileList")
            .match_body(Matcher::PartialJson(json!({
                "additionalFilter": "*.pdf",
                "repositoryProperties": {
                    "configurationOptions": { "mode": "full" },
                    "repositoryOptions": { "root": "/srv" }
                }
            })))
            .with_status(200)
            .with_body(r#"{"failures":[{"itemLocation":"/x","message":"denied"}],"items":[]}"#)
            .create_async()
            .await;
        let api = HttpAdapterApi::new(server.url()).unwrap();

        let response = api
            .retrieve_file_list(FileListRequest {
                additional_filter: Some("*.pdf".to_string()),
                repository_properties: properties(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.failures.len(), 1);
        assert!(response.items.is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_files_data() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/retrieveFilesData")
            .match_body(Matcher::PartialJson(json!({
                "items": [{ "itemId": "id-1", "metadata": { "itemLocation": "/a", "modifiedTime": "2024-01-01T00:00:00Z" } }]
            })))
            .with_status(200)
            .with_body(
                r#"{"failures":[],"items":[{"itemId":"id-1","fileContents":"aGVsbG8=",
                    "metadata":{"itemLocation":"/a","name":"a","modifiedTime":"2024-01-01T00:00:00Z"}}]}"#,
            )
            .create_async()
            .await;
        let api = HttpAdapterApi::new(server.url()).unwrap();

        let response = api
            .retrieve_files_data(FileDataRequest {
                repository_properties: properties(),
                items: vec![RemoteRepositoryItem {
                    item_id: "id-1".to_string(),
                    metadata: RemoteItemMetadata {
                        item_location: "/a".to_string(),
                        name: "a".to_string(),
                        title: None,
                        size: None,
                        created_time: None,
                        accessed_time: None,
                        modified_time: "2024-01-01T00:00:00Z".to_string(),
                        version: None,
                        additional_metadata: Default::default(),
                    },
                }],
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.items[0].file_contents, "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_error_status_becomes_remote_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/adapterDescriptor")
            .with_status(500)
            .with_body("repository offline")
            .create_async()
            .await;
        let api = HttpAdapterApi::new(server.url()).unwrap();

        match api.adapter_descriptor().await {
            Err(AdapterError::Remote { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "repository offline");
            }
            other => panic!("Expected Remote error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_error_body_uses_reason() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/adapterDescriptor")
            .with_status(404)
            .create_async()
            .await;
        let api = HttpAdapterApi::new(server.url()).unwrap();

        match api.adapter_descriptor().await {
            Err(AdapterError::Remote { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("Expected Remote error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_serialization_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/adapterDescriptor")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;
        let api = HttpAdapterApi::new(server.url()).unwrap();

        assert!(matches!(
            api.adapter_descriptor().await,
            Err(AdapterError::Serialization(_))
        ));
    }

    #[test]
    fn test_new_uses_default_settings() {
        let api = assert_ok!(HttpAdapterApi::new("http://repository.local"));
        assert_eq!(api.base_path(), "http://repository.local");
    }

    #[tokio::test]
    async fn test_from_settings() {
        let settings = AdapterSettings::new("http://repository.local/api");
        let api = assert_ok!(HttpAdapterApi::from_settings(&settings));
        assert_eq!(api.base_path(), "http://repository.local/api");

        assert_err!(HttpAdapterApi::from_settings(&AdapterSettings::new("nope")));
    }
}
