use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    api::AdapterApi,
    error::{AdapterError, Result},
    handler::{FailureRegistration, FileDataResultsHandler, FileListResultsHandler},
    model::{FileDataRequest, FileListRequest, RemoteFailureDetails},
    options::convert_properties,
    repository::RepositoryAdapter,
    translate,
    types::{
        AdapterDescriptor, FailureDetails, FileContents, RetrieveFileListRequest,
        RetrieveFilesDataRequest,
    },
};

/// Repository adapter backed by a remote repository service
///
/// Holds nothing but the client, so one instance can serve concurrent
/// list and fetch calls.
pub struct RestAdapter {
    api: Arc<dyn AdapterApi>,
}

impl RestAdapter {
    pub fn new(api: Arc<dyn AdapterApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl RepositoryAdapter for RestAdapter {
    async fn create_descriptor(&self) -> Result<AdapterDescriptor> {
        let remote = self.api.adapter_descriptor().await?;
        let descriptor = translate::descriptor_from_remote(remote);
        debug!(
            adapter_type = %descriptor.adapter_type,
            settings = descriptor.setting_definitions.len(),
            "Adapter descriptor retrieved"
        );
        Ok(descriptor)
    }

    async fn retrieve_file_list(
        &self,
        request: &RetrieveFileListRequest,
        handler: &dyn FileListResultsHandler,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let remote_request = FileListRequest {
            additional_filter: request.additional_filter.clone(),
            repository_properties: convert_properties(&request.repository_properties)?,
        };

        let response = until_cancelled(cancel, self.api.retrieve_file_list(remote_request)).await?;
        info!(
            failures = response.failures.len(),
            items = response.items.len(),
            "Retrieved file list"
        );

        register_failures(response.failures, handler, cancel).await?;

        for item in response.items {
            let metadata = translate::metadata_from_remote(item.item_metadata)?;
            handler.queue_item(metadata, item.partition_hint, cancel).await?;
        }

        Ok(())
    }

    async fn retrieve_files_data(
        &self,
        request: &RetrieveFilesDataRequest,
        handler: &dyn FileDataResultsHandler,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let remote_request = FileDataRequest {
            repository_properties: convert_properties(&request.repository_properties)?,
            items: request
                .items
                .iter()
                .map(translate::item_to_remote)
                .collect::<Result<Vec<_>>>()?,
        };

        let response = until_cancelled(cancel, self.api.retrieve_files_data(remote_request)).await?;
        info!(
            requested = request.items.len(),
            failures = response.failures.len(),
            items = response.items.len(),
            "Retrieved files data"
        );

        register_failures(response.failures, handler, cancel).await?;

        let requested: HashSet<&str> = request.items.iter().map(|i| i.item_id.as_str()).collect();

        for item in response.items {
            if !requested.contains(item.item_id.as_str()) {
                warn!(item_id = %item.item_id, "Remote repository returned an item that was not requested");
            }

            // A bad payload only fails its own item.
            let contents = match FileContents::from_base64(&item.file_contents) {
                Ok(contents) => contents,
                Err(e) => {
                    warn!(item_id = %item.item_id, error = %e, "Undecodable file contents");
                    handler
                        .register_failure(
                            &item.metadata.item_location,
                            FailureDetails::new(format!(
                                "Invalid base64 contents for item {}: {}",
                                item.item_id, e
                            )),
                            cancel,
                        )
                        .await?;
                    continue;
                }
            };

            let metadata = translate::metadata_from_remote(item.metadata)?;
            handler.queue_item(&item.item_id, contents, metadata, cancel).await?;
        }

        Ok(())
    }
}

async fn register_failures<H>(
    failures: Vec<RemoteFailureDetails>,
    handler: &H,
    cancel: &CancellationToken,
) -> Result<()>
where
    H: FailureRegistration + ?Sized,
{
    for failure in failures {
        debug!(item_location = %failure.item_location, message = %failure.message, "Item failure reported");
        handler
            .register_failure(&failure.item_location, FailureDetails::new(failure.message), cancel)
            .await?;
    }
    Ok(())
}

/// Race a remote call against the token; cancellation wins ties
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AdapterError::Cancelled),
        result = call => result,
    }
}
