//! Provider backed by a local directory
//!
//! `<root>/<bucket>/<key>` holds each object. Useful for dry runs, mirroring
//! onto mounted storage, and tests.

use super::{FileOption, Provider};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use labelsync_common::naming::join_path;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct LocalProvider {
    root: PathBuf,
}

impl LocalProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, opt: &FileOption) -> PathBuf {
        join_path(&self.root, &[&opt.bucket_name, &opt.dst_path])
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl Provider for LocalProvider {
    async fn check_bucket(&self, bucket_name: &str) -> Result<()> {
        let bucket = join_path(&self.root, &[bucket_name]);
        match tokio::fs::metadata(&bucket).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => bail!("bucket is not a directory: [{}]", bucket.display()),
            Err(_) => bail!("bucket does not exist: [{}]", bucket.display()),
        }
    }

    async fn is_exists(&self, opt: &FileOption) -> Result<bool> {
        let path = self.object_path(opt);
        tokio::fs::try_exists(&path)
            .await
            .with_context(|| format!("stat {}", path.display()))
    }

    async fn upload_from_local_file(&self, opt: &FileOption) -> Result<()> {
        let dst = self.object_path(opt);
        if let Some(parent) = dst.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let bytes = tokio::fs::copy(&opt.src_path, &dst)
            .await
            .with_context(|| format!("copying {} to {}", opt.src_path, dst.display()))?;

        debug!(bytes, dst = %dst.display(), "Stored object");
        Ok(())
    }
}
