//! Episode records emitted by the fetch pipeline.

use serde::{Deserialize, Serialize};

/// One fetched video, with or without a transcript.
///
/// Created once during fetch and never mutated afterwards; the chunker reads
/// these back from the fetcher's JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Display name of the podcast channel.
    pub podcast: String,
    pub title: String,
    pub video_id: String,
    /// Canonical watch URL.
    pub url: String,
    /// Publish timestamp as returned by the API (RFC 3339).
    pub published_at: String,
    /// Description, already truncated at fetch time.
    pub description: String,
    pub transcript: Option<String>,
    pub has_transcript: bool,
}

impl Episode {
    /// Build an episode record. `has_transcript` is derived from the
    /// transcript so the two can never disagree.
    pub fn new(
        podcast: &str,
        title: &str,
        video_id: &str,
        url: &str,
        published_at: &str,
        description: &str,
        transcript: Option<String>,
    ) -> Self {
        let has_transcript = transcript.is_some();
        Self {
            podcast: podcast.to_string(),
            title: title.to_string(),
            video_id: video_id.to_string(),
            url: url.to_string(),
            published_at: published_at.to_string(),
            description: description.to_string(),
            transcript,
            has_transcript,
        }
    }

    /// Transcript length in characters (0 when absent).
    pub fn transcript_len(&self) -> usize {
        self.transcript
            .as_deref()
            .map(|t| t.chars().count())
            .unwrap_or(0)
    }
}
