//! Destination namespace index
//!
//! Remembers which namespaces (output directories, key prefixes) have been
//! materialised during this run so the "create container" side effect runs
//! once per namespace even when many items of the same label are in flight.

use crate::capability::LocalFs;
use crate::error::TransferError;
use async_trait::async_trait;
use labelsync_common::naming::join_path;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Side effect that makes a namespace's container exist.
///
/// Implementations must be idempotent.
#[async_trait]
pub trait Materialize: Send + Sync {
    async fn materialize(&self, namespace: &str) -> std::io::Result<()>;
}

/// Creates `<root>/<namespace>` on the local filesystem
pub struct DirectoryMaterializer {
    fs: Arc<dyn LocalFs>,
    root: PathBuf,
}

impl DirectoryMaterializer {
    pub fn new(fs: Arc<dyn LocalFs>, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
        }
    }
}

#[async_trait]
impl Materialize for DirectoryMaterializer {
    async fn materialize(&self, namespace: &str) -> std::io::Result<()> {
        self.fs.ensure_dir(&join_path(&self.root, &[namespace])).await
    }
}

/// Object-store key prefixes exist implicitly; nothing to create
#[derive(Debug, Clone, Copy, Default)]
pub struct ImplicitPrefix;

#[async_trait]
impl Materialize for ImplicitPrefix {
    async fn materialize(&self, _namespace: &str) -> std::io::Result<()> {
        Ok(())
    }
}

/// Set of namespaces already ensured in this run
///
/// Lookups take a shared lock so concurrent readers never block each other.
/// The first caller for a namespace takes the exclusive lock, re-checks,
/// runs the materialiser and records the namespace before releasing it.
/// A namespace whose materialisation failed is not recorded, so a later
/// item may try again.
pub struct DestinationIndex {
    ensured: RwLock<HashSet<String>>,
    materializer: Arc<dyn Materialize>,
}

impl DestinationIndex {
    pub fn new(materializer: Arc<dyn Materialize>) -> Self {
        Self {
            ensured: RwLock::new(HashSet::new()),
            materializer,
        }
    }

    pub async fn ensure(&self, namespace: &str) -> Result<(), TransferError> {
        if self.has(namespace).await {
            return Ok(());
        }

        let mut ensured = self.ensured.write().await;
        if ensured.contains(namespace) {
            return Ok(());
        }

        self.materializer
            .materialize(namespace)
            .await
            .map_err(|source| TransferError::Materialize {
                namespace: namespace.to_string(),
                source,
            })?;
        ensured.insert(namespace.to_string());
        Ok(())
    }

    pub async fn has(&self, namespace: &str) -> bool {
        self.ensured.read().await.contains(namespace)
    }

    /// Number of namespaces recorded so far
    pub async fn len(&self) -> usize {
        self.ensured.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.ensured.read().await.is_empty()
    }
}
