use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::{
    error::Result,
    model::{FileDataRequest, FileDataResponse, FileListRequest, FileListResponse, RemoteAdapterDescriptor},
};

/// Client for the remote repository service
///
/// Per-item problems come back as data in the `failures` of a response;
/// an `Err` means the call itself failed.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait AdapterApi: Send + Sync {
    /// Describe the remote adapter and the settings it accepts
    async fn adapter_descriptor(&self) -> Result<RemoteAdapterDescriptor>;

    /// List items matching the request
    async fn retrieve_file_list(&self, request: FileListRequest) -> Result<FileListResponse>;

    /// Fetch the contents of previously listed items
    async fn retrieve_files_data(&self, request: FileDataRequest) -> Result<FileDataResponse>;
}
