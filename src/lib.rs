pub mod adapter;
pub mod api;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod model;
pub mod options;
pub mod repository;
pub mod translate;
pub mod types;

pub use adapter::RestAdapter;
pub use api::AdapterApi;
#[cfg(any(test, feature = "test-export-mocks"))]
pub use api::MockAdapterApi;
pub use config::{load_settings, AdapterSettings, ProxyDetails};
pub use error::{AdapterError, Result};
pub use handler::{
    ChannelResultsHandler, FailureRegistration, FileDataResultsHandler, FileListResultsHandler,
    ResultEvent,
};
pub use http::HttpAdapterApi;
pub use options::{OptionsProvider, StaticOptions};
pub use repository::RepositoryAdapter;
pub use tokio_util::sync::CancellationToken;
pub use types::{
    AdapterDescriptor, FailureDetails, FileContents, ItemMetadata, PartitionHint, RepositoryItem,
    RepositoryProperties, RepositorySettingDefinition, RetrieveFileListRequest,
    RetrieveFilesDataRequest, SettingType,
};
