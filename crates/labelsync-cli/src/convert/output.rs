//! Line-oriented output files

use crate::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Output file opened before any input is processed, so a bad output path
/// fails the command early.
pub struct ListWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    lines: usize,
}

impl ListWriter {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            lines: 0,
        })
    }

    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    pub fn write_all<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.write_line(line.as_ref())?;
        }
        Ok(())
    }

    /// Flush and return the number of lines written
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        info!(path = %self.path.display(), lines = self.lines, "Wrote list file");
        Ok(self.lines)
    }
}
