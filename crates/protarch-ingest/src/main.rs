//! Protarch CLI - Main entry point

use clap::Parser;
use protarch_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use protarch_ingest::{commands, Cli, Commands};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Verbose mode logs debug records; otherwise only warnings reach stderr
    let log_config = LogConfig::builder()
        .level(if cli.verbose { LogLevel::Debug } else { LogLevel::Warn })
        .output(LogOutput::Console)
        .log_file_prefix("protarch")
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging
    let _ = init_logging(&log_config);

    if let Err(e) = execute_command(cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn execute_command(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Run(ref args) => commands::run(config, args).await,

        Commands::Quality {
            domains,
            qscores,
            summary,
            output,
        } => commands::quality(config, domains, qscores, summary, output).await,

        Commands::ParseTed {
            boundaries,
            proteins,
            output,
        } => commands::parse_ted(boundaries, proteins, output).await,

        Commands::SequenceFeatures {
            mobidb,
            features,
            output,
        } => commands::sequence_features(config, mobidb, features, output).await,
    }
}
