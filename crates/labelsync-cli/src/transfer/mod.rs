//! Transfer operations
//!
//! Both variants follow the same protocol for one work item:
//!
//! 1. derive the destination identifier
//! 2. ensure the item's namespace exists (via [`DestinationIndex`])
//! 3. check whether the destination already exists; if so, skip
//! 4. transfer the body
//!
//! Any error is terminal for that item only. Nothing is retried.
//!
//! [`DestinationIndex`]: crate::pipeline::DestinationIndex

pub mod download;
pub mod upload;

pub use download::DownloadOperation;
pub use upload::UploadOperation;

use crate::error::TransferError;
use async_trait::async_trait;
use labelsync_common::WorkItem;

/// Successful end states of one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The body was transferred
    Transferred,
    /// The destination already existed
    AlreadyPresent,
}

/// A unit of work the executor can run for each admitted item
#[async_trait]
pub trait TransferOperation: Send + Sync {
    /// Fully-qualified destination identifier (local path or object key)
    fn destination(&self, item: &WorkItem) -> String;

    /// Run the ensure → exists → transfer protocol for `item`
    async fn execute(
        &self,
        item: &WorkItem,
        destination: &str,
    ) -> Result<Disposition, TransferError>;
}
