//! `labelsync list` command implementation
//!
//! Writes a training list file from an image directory. Each sub directory
//! name is used as the label.

use crate::convert::{ListFormat, ListWriter};
use crate::error::Result;
use crate::source::{FileTypeFilter, TreeSource, DEFAULT_FILE_TYPES};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Image directory
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output list file
    #[arg(short, long, default_value = "./output.csv")]
    pub output: PathBuf,

    /// List every file regardless of extension
    #[arg(short = 'a', long = "all")]
    pub include_all: bool,

    /// Comma separated file extensions to list
    #[arg(short = 't', long = "type", default_value = DEFAULT_FILE_TYPES)]
    pub types: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ListFormat::Csv)]
    pub format: ListFormat,

    /// URL or path prefix for each file (e.g. gs://<bucket>)
    #[arg(short, long, default_value = "")]
    pub prefix: String,
}

/// Returns the number of lines written
pub async fn run(args: ListArgs) -> Result<usize> {
    let mut writer = ListWriter::create(&args.output)?;

    let filter = FileTypeFilter::parse(&args.types).include_all(args.include_all);
    for item in TreeSource::new(&args.input, filter)? {
        let item = item?;
        writer.write_line(&args.format.line_for(&args.prefix, &item)?)?;
    }
    let lines = writer.finish()?;

    println!(
        "{} Wrote {} {} line(s) to {}",
        "✓".green().bold(),
        lines,
        args.format,
        args.output.display()
    );
    Ok(lines)
}
