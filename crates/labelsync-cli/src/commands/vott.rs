//! `labelsync vott` command implementation

use crate::convert::list::AutomlObjectDetection;
use crate::convert::vott::{convert_files, find_json_files};
use crate::convert::ListWriter;
use crate::error::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct VottArgs {
    /// Directory of VoTT JSON exports
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output CSV file
    #[arg(short, long, default_value = "./output.csv")]
    pub output: PathBuf,

    /// Prefix prepended to each asset name
    #[arg(short, long, default_value = "gs://")]
    pub prefix: String,

    /// Read exports in sub directories too
    #[arg(short, long)]
    pub recursive: bool,
}

/// Returns the number of rows written
pub async fn run(args: VottArgs) -> Result<usize> {
    let mut writer = ListWriter::create(&args.output)?;

    let files = find_json_files(&args.input, args.recursive)?;
    let rows = convert_files(&files, &AutomlObjectDetection::new(&args.prefix))?;
    writer.write_all(&rows)?;
    let written = writer.finish()?;

    println!(
        "{} Converted {} export(s) into {} row(s) in {}",
        "✓".green().bold(),
        files.len(),
        written,
        args.output.display()
    );
    Ok(written)
}
