//! YouTube Data API v3 client.

use super::{PlaylistVideo, VideoPlatform};
use crate::error::{DigestError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Default timeout for Data API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Thin client over the YouTube Data API v3.
pub struct YoutubeClient {
    http: reqwest::Client,
    api_key: String,
}

impl YoutubeClient {
    /// Create a client with the default request timeout.
    pub fn new(api_key: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_key: api_key.to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", API_BASE, endpoint);

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DigestError::Api(format!(
                "{} returned {}: {}",
                endpoint,
                status,
                error_reason(&body)
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Pull the human-readable reason out of a Data API error body, falling
/// back to a trimmed raw body.
fn error_reason(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorEnvelope>(body) {
        if !parsed.error.message.is_empty() {
            return parsed.error.message;
        }
    }
    body.chars().take(200).collect()
}

#[async_trait]
impl VideoPlatform for YoutubeClient {
    #[instrument(skip(self))]
    async fn search_channel_id(&self, handle: &str) -> Result<Option<String>> {
        let query = format!("@{}", handle);
        let response: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("q", &query),
                    ("type", "channel"),
                    ("maxResults", "1"),
                ],
            )
            .await?;

        let channel_id = response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.snippet.channel_id);

        debug!(?channel_id, "Resolved handle");
        Ok(channel_id)
    }

    #[instrument(skip(self))]
    async fn uploads_playlist_id(&self, channel_id: &str) -> Result<Option<String>> {
        let response: ChannelListResponse = self
            .get_json(
                "channels",
                &[("part", "contentDetails"), ("id", channel_id)],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.content_details)
            .and_then(|details| details.related_playlists)
            .map(|playlists| playlists.uploads))
    }

    #[instrument(skip(self))]
    async fn playlist_items(
        &self,
        playlist_id: &str,
        max_results: u32,
    ) -> Result<Vec<PlaylistVideo>> {
        let max = max_results.to_string();
        let response: PlaylistItemsResponse = self
            .get_json(
                "playlistItems",
                &[
                    ("part", "snippet,contentDetails"),
                    ("playlistId", playlist_id),
                    ("maxResults", &max),
                ],
            )
            .await?;

        let videos = response
            .items
            .into_iter()
            .map(|item| PlaylistVideo {
                video_id: item.snippet.resource_id.video_id,
                title: item.snippet.title,
                published_at: item.snippet.published_at.unwrap_or_default(),
                description: item.snippet.description.unwrap_or_default(),
            })
            .collect();

        Ok(videos)
    }
}

// Wire types. Only the fields the pipeline reads are declared; the API
// returns far more.

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemsResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: PlaylistSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistSnippet {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_items_response_parses() {
        let body = r#"{
            "items": [{
                "snippet": {
                    "title": "A Long Conversation",
                    "description": "Show notes",
                    "publishedAt": "2024-06-01T12:00:00Z",
                    "resourceId": {"kind": "youtube#video", "videoId": "abc123def45"}
                }
            }]
        }"#;
        let parsed: PlaylistItemsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.items.len(), 1);
        let snippet = &parsed.items[0].snippet;
        assert_eq!(snippet.resource_id.video_id, "abc123def45");
        assert_eq!(snippet.published_at.as_deref(), Some("2024-06-01T12:00:00Z"));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let body = r#"{
            "items": [{
                "snippet": {
                    "title": "No dates here",
                    "resourceId": {"videoId": "abc123def45"}
                }
            }]
        }"#;
        let parsed: PlaylistItemsResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.items[0].snippet.published_at.is_none());
        assert!(parsed.items[0].snippet.description.is_none());
    }

    #[test]
    fn test_error_reason_extraction() {
        let body = r#"{"error": {"code": 403, "message": "quotaExceeded"}}"#;
        assert_eq!(error_reason(body), "quotaExceeded");
        assert_eq!(error_reason("plain text"), "plain text");
    }

    #[test]
    fn test_empty_search_response() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.items.is_empty());
    }
}
