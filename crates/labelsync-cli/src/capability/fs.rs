//! Local filesystem capability

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;

static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

/// Filesystem operations used by downloads
#[async_trait]
pub trait LocalFs: Send + Sync {
    /// Whether anything exists at `path`
    async fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Create `path` and its parents; succeeds if it already exists
    async fn ensure_dir(&self, path: &Path) -> io::Result<()>;

    /// Write `bytes` to `path`, replacing any existing file.
    ///
    /// `path` only ever holds complete content: a write that fails or is
    /// dropped part way leaves no file at `path`.
    async fn write_file(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// [`LocalFs`] backed by `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFs;

#[async_trait]
impl LocalFs for TokioFs {
    async fn exists(&self, path: &Path) -> io::Result<bool> {
        tokio::fs::try_exists(path).await
    }

    async fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    async fn write_file(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let staging = staging_path(path)?;
        let written = write_staged(&staging, bytes).await;
        let result = match written {
            Ok(()) => tokio::fs::rename(&staging, path).await,
            Err(e) => Err(e),
        };
        if result.is_err() {
            let _ = tokio::fs::remove_file(&staging).await;
        }
        result
    }
}

/// Hidden sibling of `path` that the content is staged in before the rename
fn staging_path(path: &Path) -> io::Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("no file name in '{}'", path.display()))
    })?;
    let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
    Ok(path.with_file_name(format!(
        ".{}.{}-{}.part",
        name.to_string_lossy(),
        std::process::id(),
        seq
    )))
}

async fn write_staged(staging: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(staging)
        .await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ensure_dir_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("cats").join("small");

        TokioFs.ensure_dir(&dir).await.unwrap();
        TokioFs.ensure_dir(&dir).await.unwrap();
        assert!(TokioFs.exists(&dir).await.unwrap());
    }

    #[tokio::test]
    async fn test_write_file_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.jpg");

        assert!(!TokioFs.exists(&path).await.unwrap());
        TokioFs.write_file(&path, b"\x89PNG\r\n").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"\x89PNG\r\n");

        TokioFs.write_file(&path, b"x").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"x");
    }

    #[tokio::test]
    async fn test_write_file_missing_parent_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("a.jpg");
        assert!(TokioFs.write_file(&path, b"data").await.is_err());
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_write_file_leaves_no_staging_file() {
        let temp = TempDir::new().unwrap();
        TokioFs.write_file(&temp.path().join("a.jpg"), b"data").await.unwrap();
        assert_eq!(entries(temp.path()), vec!["a.jpg"]);
    }

    #[tokio::test]
    async fn test_failed_rename_removes_staging_file() {
        let temp = TempDir::new().unwrap();
        // a directory in the way makes the final rename fail
        let path = temp.path().join("a.jpg");
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        assert!(TokioFs.write_file(&path, b"data").await.is_err());
        assert!(path.is_dir());
        assert_eq!(entries(temp.path()), vec!["a.jpg"]);
    }

    #[tokio::test]
    async fn test_dropped_write_never_exposes_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("big.bin");
        let payload = vec![7u8; 8 * 1024 * 1024];

        // drop the write before it can complete
        let write = TokioFs.write_file(&path, &payload);
        let _ = tokio::time::timeout(std::time::Duration::from_nanos(1), write).await;

        if path.exists() {
            assert_eq!(std::fs::metadata(&path).unwrap().len(), payload.len() as u64);
        }
    }
}
