//! YouTube Data API access.
//!
//! The fetch pipeline talks to the platform through the [`VideoPlatform`]
//! trait so tests can substitute a fake; [`YoutubeClient`] is the real
//! Data API v3 implementation.

mod client;

pub use client::YoutubeClient;

use crate::error::Result;
use async_trait::async_trait;

/// One entry from a channel's uploads playlist, before filtering.
#[derive(Debug, Clone)]
pub struct PlaylistVideo {
    pub video_id: String,
    pub title: String,
    /// RFC 3339 timestamp; empty string when the API omitted it.
    pub published_at: String,
    pub description: String,
}

/// Video-platform metadata operations used by the fetch pipeline.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Resolve a public @-handle to a channel ID. `Ok(None)` means the
    /// search returned no match.
    async fn search_channel_id(&self, handle: &str) -> Result<Option<String>>;

    /// Look up the channel's canonical uploads playlist. `Ok(None)` means
    /// the channel carries no uploads playlist data.
    async fn uploads_playlist_id(&self, channel_id: &str) -> Result<Option<String>>;

    /// Fetch up to `max_results` most-recent entries from a playlist
    /// (single page, provider order).
    async fn playlist_items(
        &self,
        playlist_id: &str,
        max_results: u32,
    ) -> Result<Vec<PlaylistVideo>>;
}
