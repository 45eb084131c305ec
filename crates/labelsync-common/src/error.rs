//! Error types for labelsync

use thiserror::Error;

/// Result type alias for labelsync operations
pub type Result<T> = std::result::Result<T, LabelsyncError>;

/// Main error type shared across the workspace
#[derive(Error, Debug)]
pub enum LabelsyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl LabelsyncError {
    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
