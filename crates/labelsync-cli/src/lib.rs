//! labelsync CLI Library
//!
//! Moves labelled image datasets between the web, local disk and object
//! storage.
//!
//! # Overview
//!
//! - **Download**: fetch every URL of a CSV list into `<output>/<label>/` (`labelsync download`)
//! - **Upload**: copy an image tree into an S3/GCS bucket (`labelsync upload`)
//! - **List**: write a training list file from an image tree (`labelsync list`)
//! - **VoTT**: convert VoTT exports into AutoML object-detection rows (`labelsync vott`)
//!
//! Downloads and uploads run through the bounded-concurrency
//! [`pipeline`]: a failing item is reported and never stops its siblings,
//! and items whose destination already exists are skipped.

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod capability;
pub mod commands;
pub mod config;
pub mod convert;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod provider;
pub mod source;
pub mod transfer;

// Re-export commonly used types
pub use error::{CliError, Result, TransferError};
pub use pipeline::{BoundedExecutor, ProgressReporter, RunSummary};

use clap::{Parser, Subcommand};

/// labelsync - bulk transfer for labelled image datasets
#[derive(Parser, Debug)]
#[command(name = "labelsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the CLI reference as Markdown and exit
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download files listed in a CSV file
    Download(commands::download::DownloadArgs),

    /// Upload files from a directory to a cloud bucket (S3, GCS)
    Upload(commands::upload::UploadArgs),

    /// Create a list file from the images in a directory
    List(commands::list::ListArgs),

    /// Create an object-detection list file from VoTT results
    Vott(commands::vott::VottArgs),
}
