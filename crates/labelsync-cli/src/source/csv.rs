//! Row source over a header-tagged CSV stream

use crate::error::{CliError, Result};
use labelsync_common::WorkItem;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Names of the columns holding each work item field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: String,
    pub label: String,
    pub url: String,
}

impl ColumnMap {
    pub fn new(name: impl Into<String>, label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            url: url.into(),
        }
    }
}

/// Yields one [`WorkItem`] per data row.
///
/// Rows must have as many fields as the header; a malformed row ends the
/// stream with an error.
pub struct CsvSource<R> {
    records: ::csv::StringRecordsIntoIter<R>,
    name: usize,
    label: usize,
    url: usize,
    finished: bool,
}

impl CsvSource<File> {
    /// Open `path` and validate its header against `columns`
    pub fn open(path: impl AsRef<Path>, columns: &ColumnMap) -> Result<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let meta = std::fs::metadata(path).map_err(|_| CliError::FileNotFound(shown.clone()))?;
        if meta.is_dir() {
            return Err(CliError::IsDirectory(shown));
        }

        let file = File::open(path)?;
        debug!(path = %path.display(), "Opened CSV input");
        Self::from_reader(file, columns)
    }
}

impl<R: Read> CsvSource<R> {
    pub fn from_reader(reader: R, columns: &ColumnMap) -> Result<Self> {
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let position = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| CliError::MissingColumn(column.to_string()))
        };

        let name = position(&columns.name)?;
        let label = position(&columns.label)?;
        let url = position(&columns.url)?;

        Ok(Self {
            records: reader.into_records(),
            name,
            label,
            url,
            finished: false,
        })
    }
}

impl<R: Read> Iterator for CsvSource<R> {
    type Item = Result<WorkItem>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.records.next()? {
            Ok(record) => {
                let field = |i: usize| record.get(i).unwrap_or_default();
                Some(Ok(WorkItem::new(field(self.url), field(self.label), field(self.name))))
            },
            Err(e) => {
                self.finished = true;
                Some(Err(CliError::Csv(e)))
            },
        }
    }
}
