//! Build automation tasks for labelsync
//!
//! - Generating the CLI reference from the clap definitions

use anyhow::{bail, Context};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for labelsync", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in Markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,

        /// Fail instead of writing when the file on disk is out of date
        #[arg(long)]
        check: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir, check } => generate_cli_docs(&output_dir, check)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str, check: bool) -> anyhow::Result<()> {
    let markdown = clap_markdown::help_markdown::<labelsync_cli::Cli>();

    let content = format!(
        r#"# labelsync CLI Reference

This documentation is generated from the CLI source code.

## Quick Start

```bash
# Download every URL of a CSV list into ./images/<label>/
labelsync download -i list.csv -n name -l label -u url -o ./images -m 4

# Write a training list for the downloaded images
labelsync list -i ./images -o ./list.csv -p gs://my-bucket/train

# Upload the images and the list to GCS
labelsync upload -c gcs -b my-bucket -p train -i ./images -l ./list.csv
```

## Commands

{}

## Environment Variables

- `LABELSYNC_PARALLEL` - Number of concurrent transfers (default: `2`)
- `LABELSYNC_OPERATION_TIMEOUT_SECS` - Per-item timeout, `0` disables (default: off)
- `LABELSYNC_HTTP_TIMEOUT_SECS` - HTTP client timeout (default: `300`)
- `LABELSYNC_USER_AGENT` - User agent for downloads
- `LABELSYNC_LOCAL_ROOT` - Root directory of the `local` provider
- `S3_ENDPOINT`, `AWS_REGION`, `S3_ACCESS_KEY`, `S3_SECRET_KEY`, `S3_PATH_STYLE` - S3 connection
- `GCS_HMAC_ACCESS_KEY`, `GCS_HMAC_SECRET` - GCS interoperability keys
- `LOG_LEVEL`, `LOG_OUTPUT`, `LOG_FORMAT`, `LOG_DIR` - Logging

Variables can also be placed in a `.env` file in the working directory.

---

*To update, run `cargo run -p xtask -- generate-cli-docs`.*
"#,
        markdown
    );

    let file_path = PathBuf::from(output_dir).join("cli-reference.md");

    if check {
        let current = fs::read_to_string(&file_path)
            .with_context(|| format!("reading {}", file_path.display()))?;
        if current != content {
            bail!(
                "{} is out of date, run `cargo run -p xtask -- generate-cli-docs`",
                file_path.display()
            );
        }
        println!("✅ {} is up to date", file_path.display());
        return Ok(());
    }

    fs::create_dir_all(output_dir)?;
    fs::write(&file_path, content)?;

    println!("✅ Generated CLI documentation at: {}", file_path.display());
    Ok(())
}
