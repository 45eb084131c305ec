//! labelsync CLI - Main entry point

use clap::Parser;
use labelsync_cli::{Cli, Commands};
use labelsync_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    // Load .env before anything reads the environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    let Some(command) = cli.command else {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    };

    // Quiet console by default, debug with --verbose; LOG_* variables win
    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .log_file_prefix("labelsync".to_string())
        .build();
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // CLI should work without logging
    let _guard = init_logging(&log_config).ok().flatten();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing transfers already in flight");
            on_interrupt.cancel();
        }
    });

    if let Err(e) = execute_command(command, cancel).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(command: Commands, cancel: CancellationToken) -> labelsync_cli::Result<()> {
    match command {
        Commands::Download(args) => labelsync_cli::commands::download::run(args, cancel)
            .await
            .map(drop),
        Commands::Upload(args) => labelsync_cli::commands::upload::run(args, cancel)
            .await
            .map(drop),
        Commands::List(args) => labelsync_cli::commands::list::run(args).await.map(drop),
        Commands::Vott(args) => labelsync_cli::commands::vott::run(args).await.map(drop),
    }
}
