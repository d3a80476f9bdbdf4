use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

use crate::{
    error::{AdapterError, Result},
    types::{FailureDetails, FileContents, ItemMetadata, PartitionHint},
};

/// Sink for items that could not be processed
#[async_trait]
pub trait FailureRegistration: Send + Sync {
    async fn register_failure(
        &self,
        item_location: &str,
        details: FailureDetails,
        cancel: &CancellationToken,
    ) -> Result<()>;
}

/// Receives the results of a list operation, one item at a time
#[async_trait]
pub trait FileListResultsHandler: FailureRegistration {
    async fn queue_item(
        &self,
        metadata: ItemMetadata,
        partition_hint: Option<PartitionHint>,
        cancel: &CancellationToken,
    ) -> Result<()>;
}

/// Receives the results of a fetch operation, one item at a time
#[async_trait]
pub trait FileDataResultsHandler: FailureRegistration {
    async fn queue_item(
        &self,
        item_id: &str,
        contents: FileContents,
        metadata: ItemMetadata,
        cancel: &CancellationToken,
    ) -> Result<()>;
}

/// A single notification delivered through [`ChannelResultsHandler`]
#[derive(Debug)]
pub enum ResultEvent {
    Failure {
        item_location: String,
        details: FailureDetails,
    },
    Listed {
        metadata: ItemMetadata,
        partition_hint: Option<PartitionHint>,
    },
    Fetched {
        item_id: String,
        contents: FileContents,
        metadata: ItemMetadata,
    },
}

/// Handler that forwards every notification into a bounded channel
///
/// Decouples the adapter from whatever consumes results; events arrive
/// on the receiver in the order the adapter emitted them.
#[derive(Clone)]
pub struct ChannelResultsHandler {
    sender: mpsc::Sender<ResultEvent>,
}

impl ChannelResultsHandler {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ResultEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Cancellation only applies while waiting for capacity
    async fn send(&self, event: ResultEvent, cancel: &CancellationToken) -> Result<()> {
        let event = match self.sender.try_send(event) {
            Ok(()) => return Ok(()),
            Err(TrySendError::Closed(_)) => return Err(receiver_dropped()),
            Err(TrySendError::Full(event)) => event,
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AdapterError::Cancelled),
            sent = self.sender.send(event) => sent.map_err(|_| receiver_dropped()),
        }
    }
}

fn receiver_dropped() -> AdapterError {
    AdapterError::Handler {
        message: "result receiver was dropped".to_string(),
    }
}

#[async_trait]
impl FailureRegistration for ChannelResultsHandler {
    async fn register_failure(
        &self,
        item_location: &str,
        details: FailureDetails,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.send(
            ResultEvent::Failure {
                item_location: item_location.to_string(),
                details,
            },
            cancel,
        )
        .await
    }
}

#[async_trait]
impl FileListResultsHandler for ChannelResultsHandler {
    async fn queue_item(
        &self,
        metadata: ItemMetadata,
        partition_hint: Option<PartitionHint>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.send(
            ResultEvent::Listed {
                metadata,
                partition_hint,
            },
            cancel,
        )
        .await
    }
}

#[async_trait]
impl FileDataResultsHandler for ChannelResultsHandler {
    async fn queue_item(
        &self,
        item_id: &str,
        contents: FileContents,
        metadata: ItemMetadata,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.send(
            ResultEvent::Fetched {
                item_id: item_id.to_string(),
                contents,
                metadata,
            },
            cancel,
        )
        .await
    }
}
