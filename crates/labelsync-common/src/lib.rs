//! labelsync Common Library
//!
//! Shared types, naming helpers, and error handling for the labelsync workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`LabelsyncError`] and the crate [`Result`] alias
//! - **Types**: [`WorkItem`] and [`TransferOutcome`], the values that flow
//!   through the transfer pipeline
//! - **Naming**: normalised path, object-key and URL composition
//! - **Logging**: `tracing` subscriber setup shared by every binary
//!
//! # Example
//!
//! ```
//! use labelsync_common::naming::join_key;
//!
//! let key = join_key("/datasets/v1", &["cats", "a.jpg"]);
//! assert_eq!(key, "datasets/v1/cats/a.jpg");
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod logging;
pub mod naming;
pub mod types;

// Re-export commonly used types
pub use error::{LabelsyncError, Result};
pub use types::{OutcomeKind, TransferOutcome, WorkItem};
