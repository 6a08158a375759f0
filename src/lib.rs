//! poddigest - Podcast Fetcher and Digest Chunker
//!
//! Fetches recent videos and transcripts from a fixed list of YouTube
//! podcast channels, then repackages the results into size-bounded chunks
//! for a downstream content-generation step.
//!
//! # Overview
//!
//! Two independent pipelines, run one after the other:
//!
//! - **fetch** resolves channel handles, lists each channel's uploads,
//!   filters out short-form videos, attaches a transcript per video, and
//!   emits one JSON array of episode records.
//! - **chunk** reads that array back, splits episodes into per-file "full"
//!   transcripts and an aggregate of short "quick hits", condenses overlong
//!   transcripts, and writes a metadata summary.
//!
//! # Architecture
//!
//! - `config` - channel roster and pipeline settings
//! - `credentials` - API key resolution (env var, interactive prompt)
//! - `youtube` - YouTube Data API client behind the `VideoPlatform` trait
//! - `transcript` - caption-track transcript retrieval and cleanup
//! - `filter` - recent-video window and short-form exclusion
//! - `episode` - the episode record written by the fetcher
//! - `fetcher` - fetch pipeline orchestration with per-unit outcomes
//! - `chunker` - digest chunk preparation
//!
//! # Example
//!
//! ```rust,no_run
//! use poddigest::config::Settings;
//! use poddigest::credentials::{CredentialProvider, EnvProvider};
//! use poddigest::fetcher::Fetcher;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let env = EnvProvider::new();
//!     let providers: [&dyn CredentialProvider; 1] = [&env];
//!     let fetcher = Fetcher::new(settings, &providers)?;
//!
//!     let run = fetcher.fetch_all().await;
//!     println!("Fetched {} episodes", run.total());
//!
//!     Ok(())
//! }
//! ```

pub mod chunker;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod episode;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod transcript;
pub mod youtube;

pub use error::{DigestError, Result};
