//! Caption-track transcript client.
//!
//! YouTube exposes caption tracks through the player response embedded in
//! the watch page. The client locates the track list there, picks a track
//! (preferring English), and fetches it in the json3 segment format.

use super::{clean_transcript, TranscriptError, TranscriptSource};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

const WATCH_URL: &str = "https://www.youtube.com/watch";

/// Default timeout for watch-page and caption-track requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Browser-like user agent; the watch page serves a reduced payload without
/// caption data to unknown clients.
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

/// Transcript source backed by YouTube caption tracks.
pub struct CaptionClient {
    http: reqwest::Client,
    tracks_regex: Regex,
}

impl CaptionClient {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        // The track list is a JSON array with no nested arrays, so a
        // non-greedy match to the first closing bracket is sufficient.
        let tracks_regex = Regex::new(r#""captionTracks":(\[.*?\])"#).expect("Invalid regex");

        Self { http, tracks_regex }
    }

    /// Extract the caption track list from a watch-page payload.
    fn extract_tracks(&self, page: &str) -> Result<Vec<CaptionTrack>, TranscriptError> {
        let Some(caps) = self.tracks_regex.captures(page) else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&caps[1])
            .map_err(|e| TranscriptError::Malformed(format!("caption track list: {}", e)))
    }

    async fn fetch_track_text(&self, track: &CaptionTrack) -> Result<String, TranscriptError> {
        let url = format!("{}&fmt=json3", track.base_url);
        let body = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let payload: Json3Payload = serde_json::from_str(&body)
            .map_err(|e| TranscriptError::Malformed(format!("json3 track: {}", e)))?;

        let segments: Vec<&str> = payload
            .events
            .iter()
            .flat_map(|event| event.segs.iter())
            .map(|seg| seg.utf8.as_str())
            .collect();

        Ok(segments.join(" "))
    }
}

impl Default for CaptionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptSource for CaptionClient {
    #[instrument(skip(self))]
    async fn fetch(&self, video_id: &str) -> Result<Option<String>, TranscriptError> {
        let page = self
            .http
            .get(WATCH_URL)
            .query(&[("v", video_id)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let tracks = self.extract_tracks(&page)?;
        let Some(track) = pick_track(&tracks) else {
            debug!("No caption tracks available");
            return Ok(None);
        };

        debug!(lang = %track.language_code, "Fetching caption track");
        let raw = self.fetch_track_text(track).await?;
        Ok(Some(clean_transcript(&raw)))
    }
}

/// Prefer an English track, otherwise take the first one offered.
fn pick_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.language_code.starts_with("en"))
        .or_else(|| tracks.first())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    #[serde(default)]
    language_code: String,
}

#[derive(Debug, Deserialize)]
struct Json3Payload {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}
