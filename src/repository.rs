use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{
    error::Result,
    handler::{FileDataResultsHandler, FileListResultsHandler},
    types::{AdapterDescriptor, RetrieveFileListRequest, RetrieveFilesDataRequest},
};

/// Contract a hosting engine drives to pull items out of a repository
///
/// Results are reported only through the handler. An `Err` aborts the whole
/// operation; per-item problems go to the handler's failure channel instead.
#[async_trait]
pub trait RepositoryAdapter: Send + Sync {
    /// Describe the adapter and the settings it needs
    async fn create_descriptor(&self) -> Result<AdapterDescriptor>;

    /// List the items in the repository
    async fn retrieve_file_list(
        &self,
        request: &RetrieveFileListRequest,
        handler: &dyn FileListResultsHandler,
        cancel: &CancellationToken,
    ) -> Result<()>;

    /// Fetch the contents of items obtained from a previous listing
    async fn retrieve_files_data(
        &self,
        request: &RetrieveFilesDataRequest,
        handler: &dyn FileDataResultsHandler,
        cancel: &CancellationToken,
    ) -> Result<()>;
}
