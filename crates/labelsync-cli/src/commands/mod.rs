//! CLI command implementations
//!
//! Each subcommand has its own module with an argument struct and a `run`
//! function.

pub mod download;
pub mod list;
pub mod upload;
pub mod vott;

use crate::pipeline::RunSummary;
use colored::Colorize;

/// Print the closing line of a transfer run
pub(crate) fn print_summary(summary: &RunSummary) {
    if summary.failed == 0 {
        println!("\n{} {}", "✓".green().bold(), summary);
    } else {
        println!("\n{} {}", "!".yellow().bold(), summary);
        println!("Failed items are listed in the log output above (run with --verbose for details).");
    }
}
