//! Remote object-store providers
//!
//! A provider is selected once, before the pipeline starts, from an explicit
//! [`ProviderKind`] and handed to the upload operation as a single
//! `Arc<dyn Provider>`.

pub mod local;
pub mod s3;

pub use local::LocalProvider;
pub use s3::S3Provider;

use crate::config::StorageConfig;
use crate::error::{CliError, Result};
use async_trait::async_trait;
use clap::ValueEnum;
use std::path::PathBuf;
use std::sync::Arc;

/// Source and destination of one object-store call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOption {
    /// Local file to read (uploads only)
    pub src_path: String,
    pub bucket_name: String,
    /// Object key inside the bucket
    pub dst_path: String,
}

impl FileOption {
    pub fn object(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket.into(),
            dst_path: key.into(),
            ..Default::default()
        }
    }

    pub fn upload(
        src_path: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            src_path: src_path.into(),
            bucket_name: bucket.into(),
            dst_path: key.into(),
        }
    }
}

/// Capability every object-store backend exposes
#[async_trait]
pub trait Provider: Send + Sync {
    /// Fails unless the bucket exists and is reachable
    async fn check_bucket(&self, bucket_name: &str) -> anyhow::Result<()>;

    /// Whether an object already exists at `opt.dst_path`
    async fn is_exists(&self, opt: &FileOption) -> anyhow::Result<bool>;

    /// Upload the bytes of `opt.src_path` to `opt.dst_path`
    async fn upload_from_local_file(&self, opt: &FileOption) -> anyhow::Result<()>;
}

/// Backend selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// Amazon S3 or any S3-compatible store
    S3,
    /// Google Cloud Storage through its S3-compatible API
    Gcs,
    /// A local directory whose sub directories act as buckets
    Local,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::S3 => write!(f, "s3"),
            ProviderKind::Gcs => write!(f, "gcs"),
            ProviderKind::Local => write!(f, "local"),
        }
    }
}

/// Build the provider for `kind`
///
/// `local_root` is required for [`ProviderKind::Local`] and ignored otherwise.
pub async fn connect(kind: ProviderKind, local_root: Option<PathBuf>) -> Result<Arc<dyn Provider>> {
    match kind {
        ProviderKind::S3 => Ok(Arc::new(S3Provider::new(&StorageConfig::from_env()).await)),
        ProviderKind::Gcs => Ok(Arc::new(S3Provider::new(&StorageConfig::for_gcs()).await)),
        ProviderKind::Local => {
            let root = local_root.ok_or_else(|| {
                CliError::config("--local-root (or LABELSYNC_LOCAL_ROOT) is required for the local provider")
            })?;
            Ok(Arc::new(LocalProvider::new(root)))
        },
    }
}
