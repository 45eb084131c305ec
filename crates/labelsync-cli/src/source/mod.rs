//! Work sources
//!
//! A work source is a plain synchronous iterator of `Result<WorkItem>`.
//! An `Err` item is fatal: the executor admits nothing after it. Settings a
//! source needs (column names, root directory, file filter) are passed in at
//! construction, never read from shared state.

pub mod csv;
pub mod tree;

pub use self::csv::{ColumnMap, CsvSource};
pub use self::tree::{FileTypeFilter, TreeSource, DEFAULT_FILE_TYPES};

use crate::error::Result;
use labelsync_common::WorkItem;

/// Anything the executor can drain on a blocking thread
pub trait WorkSource: Iterator<Item = Result<WorkItem>> + Send + 'static {}

impl<T> WorkSource for T where T: Iterator<Item = Result<WorkItem>> + Send + 'static {}
