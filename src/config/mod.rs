//! Configuration module for poddigest.
//!
//! Handles loading and managing the channel roster and pipeline settings.

mod settings;

pub use settings::{ChannelConfig, ChunkSettings, FetchSettings, Settings};
