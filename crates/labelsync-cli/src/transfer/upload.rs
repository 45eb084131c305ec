//! Copy a local file to `<bucket>/<prefix>/<namespace>/<name>`

use super::{Disposition, TransferOperation};
use crate::error::TransferError;
use crate::pipeline::DestinationIndex;
use crate::provider::{FileOption, Provider};
use async_trait::async_trait;
use labelsync_common::naming::join_key;
use labelsync_common::WorkItem;
use std::sync::Arc;

pub struct UploadOperation {
    provider: Arc<dyn Provider>,
    bucket: String,
    prefix: String,
    index: Arc<DestinationIndex>,
}

impl UploadOperation {
    pub fn new(
        provider: Arc<dyn Provider>,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        index: Arc<DestinationIndex>,
    ) -> Self {
        Self {
            provider,
            bucket: bucket.into(),
            prefix: prefix.into(),
            index,
        }
    }
}

#[async_trait]
impl TransferOperation for UploadOperation {
    fn destination(&self, item: &WorkItem) -> String {
        join_key(&self.prefix, &[&item.namespace, &item.destination_name])
    }

    async fn execute(
        &self,
        item: &WorkItem,
        destination: &str,
    ) -> Result<Disposition, TransferError> {
        self.index.ensure(&item.namespace).await?;

        let object = FileOption::upload(&item.source_ref, &self.bucket, destination);
        if self
            .provider
            .is_exists(&object)
            .await
            .map_err(|e| TransferError::existence_check(format!("{:#}", e)))?
        {
            return Ok(Disposition::AlreadyPresent);
        }

        self.provider
            .upload_from_local_file(&object)
            .await
            .map_err(|e| TransferError::upload(&e))?;

        Ok(Disposition::Transferred)
    }
}
