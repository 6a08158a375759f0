//! CLI module for poddigest.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// poddigest - Podcast Fetcher and Digest Chunker
///
/// Fetches recent videos and transcripts from a list of YouTube podcast
/// channels, and repackages the results into size-bounded chunks for
/// downstream processing.
#[derive(Parser, Debug)]
#[command(name = "poddigest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch recent episodes and transcripts from the configured channels
    Fetch {
        /// Days to look back
        #[arg(long, default_value = "7")]
        days: i64,

        /// Max videos per channel
        #[arg(long, default_value = "5")]
        max_per_channel: usize,

        /// Output file (default: print JSON to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Suppress per-video progress lines
        #[arg(long)]
        quiet: bool,
    },

    /// Break a fetched episode list into digest-sized chunk files
    Chunk {
        /// Input JSON file produced by `fetch`
        #[arg(default_value = "podcasts.json")]
        input: String,

        /// Output directory for chunk files
        #[arg(default_value_t = default_chunk_dir())]
        output_dir: String,
    },
}

fn default_chunk_dir() -> String {
    std::env::temp_dir()
        .join("podcast_chunks")
        .display()
        .to_string()
}
