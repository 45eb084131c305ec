//! Instrumented capabilities shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use labelsync_cli::capability::HttpFetch;
use labelsync_cli::pipeline::Materialize;
use labelsync_cli::provider::{FileOption, Provider};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Tracks how many calls overlap at once
#[derive(Debug, Default)]
pub struct Gauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    pub fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    pub fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// In-memory object store counting every call
#[derive(Default)]
pub struct CountingProvider {
    objects: Mutex<HashSet<String>>,
    pub exists_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub gauge: Gauge,
    pub delay: Option<Duration>,
}

impl CountingProvider {
    pub fn with_objects<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            objects: Mutex::new(keys.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains(key)
    }
}

#[async_trait]
impl Provider for CountingProvider {
    async fn check_bucket(&self, _bucket_name: &str) -> anyhow::Result<()> {
        Ok(())
    }

    async fn is_exists(&self, opt: &FileOption) -> anyhow::Result<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.objects.lock().unwrap().contains(&opt.dst_path))
    }

    async fn upload_from_local_file(&self, opt: &FileOption) -> anyhow::Result<()> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        std::fs::metadata(&opt.src_path)?;
        self.gauge.enter();
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.objects.lock().unwrap().insert(opt.dst_path.clone());
        self.gauge.leave();
        Ok(())
    }
}

/// Fetcher answering every URL with its own bytes after a short delay.
///
/// URLs containing `fail` return an error.
#[derive(Default)]
pub struct SlowFetcher {
    pub calls: AtomicUsize,
    pub gauge: Gauge,
    pub delay: Duration,
}

impl SlowFetcher {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpFetch for SlowFetcher {
    async fn get(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gauge.enter();
        tokio::time::sleep(self.delay).await;
        self.gauge.leave();
        if url.contains("fail") {
            anyhow::bail!("HTTP status server error (500 Internal Server Error) for url ({})", url);
        }
        Ok(url.as_bytes().to_vec())
    }
}

/// Wraps a materialiser and counts its invocations
pub struct CountingMaterializer {
    inner: Arc<dyn Materialize>,
    pub calls: AtomicUsize,
}

impl CountingMaterializer {
    pub fn new(inner: Arc<dyn Materialize>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Materialize for CountingMaterializer {
    async fn materialize(&self, namespace: &str) -> std::io::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.materialize(namespace).await
    }
}

/// Write `files` (relative paths) below `root`
pub fn write_tree(root: &std::path::Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, file.as_bytes()).unwrap();
    }
}
