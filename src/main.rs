//! poddigest CLI entry point.

use anyhow::Result;
use clap::Parser;
use poddigest::cli::{commands, Cli, Commands};
use poddigest::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("poddigest={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Fetch {
            days,
            max_per_channel,
            output,
            quiet,
        } => {
            commands::run_fetch(*days, *max_per_channel, output.clone(), *quiet, settings).await?;
        }

        Commands::Chunk { input, output_dir } => {
            commands::run_chunk(input, output_dir, settings)?;
        }
    }

    Ok(())
}
