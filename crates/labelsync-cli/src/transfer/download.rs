//! Fetch a URL over HTTP into `<output>/<label>/<name><ext>`

use super::{Disposition, TransferOperation};
use crate::capability::{HttpFetch, LocalFs};
use crate::error::TransferError;
use crate::pipeline::DestinationIndex;
use async_trait::async_trait;
use labelsync_common::naming::{file_name_with_extension, join_path};
use labelsync_common::WorkItem;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub struct DownloadOperation {
    fetcher: Arc<dyn HttpFetch>,
    fs: Arc<dyn LocalFs>,
    index: Arc<DestinationIndex>,
    output_dir: PathBuf,
}

impl DownloadOperation {
    pub fn new(
        fetcher: Arc<dyn HttpFetch>,
        fs: Arc<dyn LocalFs>,
        index: Arc<DestinationIndex>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            fs,
            index,
            output_dir: output_dir.into(),
        }
    }

    fn destination_path(&self, item: &WorkItem) -> PathBuf {
        let file_name = file_name_with_extension(&item.destination_name, &item.source_ref);
        join_path(&self.output_dir, &[&item.namespace, &file_name])
    }
}

#[async_trait]
impl TransferOperation for DownloadOperation {
    fn destination(&self, item: &WorkItem) -> String {
        self.destination_path(item).to_string_lossy().into_owned()
    }

    async fn execute(
        &self,
        item: &WorkItem,
        destination: &str,
    ) -> Result<Disposition, TransferError> {
        let path = Path::new(destination);

        self.index.ensure(&item.namespace).await?;

        if self
            .fs
            .exists(path)
            .await
            .map_err(TransferError::existence_check)?
        {
            return Ok(Disposition::AlreadyPresent);
        }

        let body = self
            .fetcher
            .get(&item.source_ref)
            .await
            .map_err(|e| TransferError::fetch(&e))?;
        debug!(url = %item.source_ref, bytes = body.len(), "Fetched");

        self.fs
            .write_file(path, &body)
            .await
            .map_err(|source| TransferError::Write {
                path: destination.to_string(),
                source,
            })?;

        Ok(Disposition::Transferred)
    }
}
