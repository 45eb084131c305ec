//! Error types for labelsync CLI
//!
//! [`CliError`] covers everything that aborts a run: bad input, setup and
//! configuration failures, and a work source that breaks mid-stream.
//! [`TransferError`] covers the failure of a single work item; it is turned
//! into a `Failed` outcome and never stops sibling items.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Fatal error for a whole command
#[derive(Error, Debug)]
pub enum CliError {
    /// Required file is missing
    #[error("File not found: '{0}'. Verify the file path exists and you have read permissions.")]
    FileNotFound(String),

    /// A file was expected but a directory was given
    #[error("'{0}' is a directory. Please pass the path of a file.")]
    IsDirectory(String),

    /// A directory was expected but something else was given
    #[error("'{0}' is not a directory. Please pass the path of a directory.")]
    NotADirectory(String),

    /// Input CSV lacks a column named on the command line
    #[error("Cannot find header: [{0}]. Check the column names passed with --name/--label/--url.")]
    MissingColumn(String),

    /// CSV input could not be read
    #[error("Failed to read CSV input: {0}")]
    Csv(#[from] csv::Error),

    /// Directory traversal failed somewhere below the input root
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}. Check your environment variables and command-line flags.")]
    Config(String),

    /// Object store could not be reached or the bucket is unusable
    #[error("Storage provider error: {0}")]
    Provider(String),

    /// JSON input could not be parsed
    #[error("Failed to parse JSON '{path}': {source}")]
    JsonParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// The run was cancelled before all items were admitted
    #[error("Cancelled. Items already in flight were finished before exiting.")]
    Cancelled,

    /// A worker task could not be joined
    #[error("Internal error: {0}")]
    Internal(String),

    /// Error from the shared library
    #[error(transparent)]
    Common(#[from] labelsync_common::LabelsyncError),

    /// Generic anyhow error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a storage provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Create a JSON parse error for a file
    pub fn json_parse(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonParse {
            path: path.into(),
            source,
        }
    }
}

/// Failure of one transfer operation
///
/// The `Display` text is what ends up in the item's `Failed` outcome.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("mkdir '{namespace}': {source}")]
    Materialize {
        namespace: String,
        #[source]
        source: std::io::Error,
    },

    #[error("existence check: {0}")]
    ExistenceCheck(String),

    #[error("http: {0}")]
    Fetch(String),

    #[error("write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("upload: {0}")]
    Upload(String),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("cancelled")]
    Cancelled,
}

impl TransferError {
    pub fn existence_check(err: impl std::fmt::Display) -> Self {
        Self::ExistenceCheck(err.to_string())
    }

    /// Keep the full context chain of an anyhow error in the message
    pub fn fetch(err: &anyhow::Error) -> Self {
        Self::Fetch(format!("{:#}", err))
    }

    pub fn upload(err: &anyhow::Error) -> Self {
        Self::Upload(format!("{:#}", err))
    }
}
