//! `labelsync download` command implementation
//!
//! Downloads every URL listed in a CSV file into `<output>/<label>/`.

use crate::capability::{LocalFs, ReqwestFetcher, TokioFs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::pipeline::{BoundedExecutor, DestinationIndex, DirectoryMaterializer, ProgressReporter, RunSummary};
use crate::progress;
use crate::source::{ColumnMap, CsvSource};
use crate::transfer::DownloadOperation;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Image list file (CSV with a header row)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Column holding the file name
    #[arg(short, long)]
    pub name: String,

    /// Column holding the label (output sub directory)
    #[arg(short, long)]
    pub label: String,

    /// Column holding the URL
    #[arg(short, long)]
    pub url: String,

    /// Number of concurrent downloads [default: 2]
    #[arg(short = 'm', long)]
    pub parallel: Option<usize>,

    /// Per-download timeout in seconds (0 disables)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

pub async fn run(args: DownloadArgs, cancel: CancellationToken) -> Result<RunSummary> {
    let mut config = Config::from_env()?;
    if let Some(parallel) = args.parallel {
        config.set_parallel(parallel)?;
    }
    if let Some(secs) = args.timeout {
        config.set_operation_timeout_secs(secs);
    }

    let columns = ColumnMap::new(&args.name, &args.label, &args.url);
    let source = CsvSource::open(&args.input, &columns)?;

    let fs: Arc<dyn LocalFs> = Arc::new(TokioFs);
    fs.ensure_dir(&args.output).await.map_err(CliError::Io)?;

    let fetcher = Arc::new(ReqwestFetcher::new(&config)?);
    let index = Arc::new(DestinationIndex::new(Arc::new(DirectoryMaterializer::new(
        fs.clone(),
        &args.output,
    ))));
    let operation = Arc::new(DownloadOperation::new(fetcher, fs, index, &args.output));

    println!(
        "{} Downloading from {} into {}",
        "↓".cyan(),
        args.input.display(),
        args.output.display()
    );

    let reporter = Arc::new(ProgressReporter::new(progress::create_transfer_progress(
        "downloaded",
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
