//! `labelsync upload` command implementation
//!
//! Uploads an image directory tree to a bucket, keeping sub directories as
//! key prefixes.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::pipeline::{BoundedExecutor, DestinationIndex, ImplicitPrefix, ProgressReporter, RunSummary};
use crate::progress;
use crate::provider::{self, FileOption, Provider, ProviderKind};
use crate::source::{FileTypeFilter, TreeSource, DEFAULT_FILE_TYPES};
use crate::transfer::UploadOperation;
use clap::Args;
use colored::Colorize;
use labelsync_common::naming::join_key;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    /// Image directory
    #[arg(short, long)]
    pub input: PathBuf,

    /// Comma separated file extensions to upload
    #[arg(short = 't', long = "type", default_value = DEFAULT_FILE_TYPES)]
    pub types: String,

    /// Upload every file regardless of extension
    #[arg(short = 'a', long = "all")]
    pub include_all: bool,

    /// Label file (e.g. the output of `labelsync list`) uploaded before the images
    #[arg(short = 'l', long = "label")]
    pub label_file: Option<PathBuf>,

    /// Storage provider
    #[arg(short = 'c', long)]
    pub provider: ProviderKind,

    /// Bucket name
    #[arg(short, long)]
    pub bucket: String,

    /// Key prefix inside the bucket
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    /// Number of concurrent uploads [default: 2]
    #[arg(short = 'm', long)]
    pub parallel: Option<usize>,

    /// Per-upload timeout in seconds (0 disables)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Root directory of the `local` provider
    #[arg(long, env = "LABELSYNC_LOCAL_ROOT")]
    pub local_root: Option<PathBuf>,
}

pub async fn run(args: UploadArgs, cancel: CancellationToken) -> Result<RunSummary> {
    let mut config = Config::from_env()?;
    if let Some(parallel) = args.parallel {
        config.set_parallel(parallel)?;
    }
    if let Some(secs) = args.timeout {
        config.set_operation_timeout_secs(secs);
    }

    let filter = FileTypeFilter::parse(&args.types).include_all(args.include_all);
    let source = TreeSource::new(&args.input, filter)?;

    let provider = provider::connect(args.provider, args.local_root.clone()).await?;

    let spinner = progress::create_spinner(&format!("Checking bucket {}...", args.bucket));
    let checked = provider.check_bucket(&args.bucket).await;
    spinner.finish_and_clear();
    checked.map_err(|e| {
        CliError::provider(format!("bucket '{}' on {}: {:#}", args.bucket, args.provider, e))
    })?;
    println!("{} Bucket {} ({})", "✓".green(), args.bucket, args.provider);

    let prefix = args.prefix.trim_start_matches('/');

    if let Some(label_file) = &args.label_file {
        upload_label_file(provider.as_ref(), &args.bucket, prefix, label_file).await?;
    }

    let index = Arc::new(DestinationIndex::new(Arc::new(ImplicitPrefix)));
    let operation = Arc::new(UploadOperation::new(
        provider,
        args.bucket.clone(),
        prefix,
        index,
    ));

    println!("{} Uploading {} to {}", "↑".cyan(), args.input.display(), args.bucket);

    let reporter = Arc::new(ProgressReporter::new(progress::create_transfer_progress(
        "uploaded",
    )));
    let executor = BoundedExecutor::new(config.parallel)?
        .with_timeout(config.operation_timeout)
        .with_cancellation(cancel);

    let result = executor.run(source, operation, reporter.clone()).await;
    reporter.finish();
    let summary = result?;

    super::print_summary(&summary);
    Ok(summary)
}

/// Upload the label file to `<prefix>/<file name>` before any image.
///
/// Unlike image uploads a failure here aborts the command.
async fn upload_label_file(
    provider: &dyn Provider,
    bucket: &str,
    prefix: &str,
    path: &Path,
) -> Result<()> {
    if !path.is_file() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let key = join_key(prefix, &[&file_name]);
    let object = FileOption::upload(path.to_string_lossy(), bucket, key.as_str());

    let exists = provider
        .is_exists(&object)
        .await
        .map_err(|e| CliError::provider(format!("label file '{}': {:#}", key, e)))?;
    if exists {
        info!(key = %key, "Label file already uploaded");
        println!("{} {} (already exists)", "✓".green(), key);
        return Ok(());
    }

    provider
        .upload_from_local_file(&object)
        .await
        .map_err(|e| CliError::provider(format!("label file '{}': {:#}", key, e)))?;
    println!("{} {} uploaded", "✓".green(), key);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::provider::LocalProvider;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_label_file_uploaded_once() {
        let store = TempDir::new().unwrap();
        std::fs::create_dir(store.path().join("bucket")).unwrap();
        let src = TempDir::new().unwrap();
        let labels = src.path().join("labels.csv");
        std::fs::write(&labels, "gs://bucket/cats/a.jpg,cats\n").unwrap();

        let provider = LocalProvider::new(store.path());
        upload_label_file(&provider, "bucket", "train", &labels).await.unwrap();
        assert!(store.path().join("bucket/train/labels.csv").is_file());

        // second call finds it and leaves it alone
        upload_label_file(&provider, "bucket", "train", &labels).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_label_file_is_fatal() {
        let store = TempDir::new().unwrap();
        let provider = LocalProvider::new(store.path());
        let err = upload_label_file(&provider, "bucket", "", Path::new("/no/such/labels.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }
}
