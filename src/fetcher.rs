//! Fetch pipeline orchestrator.
//!
//! Walks the configured channel roster in order, resolving each channel to
//! its uploads playlist, filtering recent videos, and attaching transcripts.
//! Per-channel and per-video failures never abort the run; each becomes an
//! explicit outcome in the returned report.

use crate::config::{ChannelConfig, Settings};
use crate::credentials::{resolve_api_key, CredentialProvider};
use crate::episode::Episode;
use crate::error::Result;
use crate::filter::{page_size, recent_videos};
use crate::transcript::{CaptionClient, TranscriptSource};
use crate::youtube::{VideoPlatform, YoutubeClient};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Why a channel produced no episodes this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Handle search returned no match.
    ChannelNotFound,
    /// Channel exists but exposes no uploads playlist.
    UploadsPlaylistMissing,
    /// The platform API failed for this channel.
    ApiError(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::ChannelNotFound => write!(f, "could not find channel"),
            SkipReason::UploadsPlaylistMissing => write!(f, "could not find uploads playlist"),
            SkipReason::ApiError(msg) => write!(f, "API error: {}", msg),
        }
    }
}

/// What happened to one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    /// Videos were fetched; `transcripts` counts those with one.
    Fetched { videos: usize, transcripts: usize },
    /// Channel resolved fine but had nothing new in the window.
    NoNewVideos,
    Skipped(SkipReason),
}

/// Per-channel record for the run report.
#[derive(Debug, Clone)]
pub struct ChannelReport {
    pub channel: String,
    pub outcome: ChannelOutcome,
}

/// Episodes fetched from one channel plus its report entry.
#[derive(Debug)]
pub struct ChannelFetch {
    pub episodes: Vec<Episode>,
    pub report: ChannelReport,
}

/// Result of a full fetch run across all channels.
#[derive(Debug, Default)]
pub struct FetchRun {
    /// All episodes, channel order preserved, provider order within each.
    pub episodes: Vec<Episode>,
    pub reports: Vec<ChannelReport>,
}

impl FetchRun {
    pub fn total(&self) -> usize {
        self.episodes.len()
    }

    pub fn with_transcript(&self) -> usize {
        self.episodes.iter().filter(|e| e.has_transcript).count()
    }

    /// Number of distinct podcasts that produced at least one episode.
    pub fn podcast_count(&self) -> usize {
        self.episodes
            .iter()
            .map(|e| e.podcast.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// The fetch pipeline.
pub struct Fetcher {
    platform: Arc<dyn VideoPlatform>,
    transcripts: Arc<dyn TranscriptSource>,
    settings: Settings,
}

impl Fetcher {
    /// Create a fetcher against the real YouTube APIs.
    ///
    /// The API key is resolved through the provider chain before any
    /// network call; a missing key is fatal.
    pub fn new(settings: Settings, providers: &[&dyn CredentialProvider]) -> Result<Self> {
        let api_key = resolve_api_key(providers)?;
        Ok(Self::with_components(
            settings,
            Arc::new(YoutubeClient::new(&api_key)),
            Arc::new(CaptionClient::new()),
        ))
    }

    /// Create a fetcher with custom components (used by tests).
    pub fn with_components(
        settings: Settings,
        platform: Arc<dyn VideoPlatform>,
        transcripts: Arc<dyn TranscriptSource>,
    ) -> Self {
        Self {
            platform,
            transcripts,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Fetch every configured channel, in roster order.
    #[instrument(skip(self), fields(channels = self.settings.channels.len()))]
    pub async fn fetch_all(&self) -> FetchRun {
        let mut run = FetchRun::default();

        for channel in &self.settings.channels {
            let fetched = self.fetch_channel(channel).await;
            run.episodes.extend(fetched.episodes);
            run.reports.push(fetched.report);
        }

        run
    }

    /// Fetch one channel. Failures become a `Skipped` report, never an error.
    #[instrument(skip(self, channel), fields(channel = %channel.name))]
    pub async fn fetch_channel(&self, channel: &ChannelConfig) -> ChannelFetch {
        let report = |outcome| ChannelReport {
            channel: channel.name.clone(),
            outcome,
        };

        let channel_id = match self.resolve_channel(channel).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                warn!("Channel not found");
                return ChannelFetch {
                    episodes: Vec::new(),
                    report: report(ChannelOutcome::Skipped(SkipReason::ChannelNotFound)),
                };
            }
            Err(e) => {
                warn!("Channel resolution failed: {}", e);
                return ChannelFetch {
                    episodes: Vec::new(),
                    report: report(ChannelOutcome::Skipped(SkipReason::ApiError(e.to_string()))),
                };
            }
        };

        let playlist_id = match self.platform.uploads_playlist_id(&channel_id).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                warn!("No uploads playlist");
                return ChannelFetch {
                    episodes: Vec::new(),
                    report: report(ChannelOutcome::Skipped(SkipReason::UploadsPlaylistMissing)),
                };
            }
            Err(e) => {
                warn!("Uploads playlist lookup failed: {}", e);
                return ChannelFetch {
                    episodes: Vec::new(),
                    report: report(ChannelOutcome::Skipped(SkipReason::ApiError(e.to_string()))),
                };
            }
        };

        let entries = match self
            .platform
            .playlist_items(&playlist_id, page_size(self.settings.fetch.max_per_channel))
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Playlist listing failed: {}", e);
                return ChannelFetch {
                    episodes: Vec::new(),
                    report: report(ChannelOutcome::Skipped(SkipReason::ApiError(e.to_string()))),
                };
            }
        };

        let now = chrono::Local::now().naive_local();
        let videos = recent_videos(&entries, &self.settings.fetch, now);

        if videos.is_empty() {
            return ChannelFetch {
                episodes: Vec::new(),
                report: report(ChannelOutcome::NoNewVideos),
            };
        }

        let mut episodes = Vec::with_capacity(videos.len());
        for video in &videos {
            let transcript = match self.transcripts.fetch(&video.video_id).await {
                // Cleaning can leave nothing; record that as absence.
                Ok(Some(text)) if !text.is_empty() => Some(text),
                Ok(_) => None,
                Err(e) => {
                    warn!(video_id = %video.video_id, "Transcript error: {}", e.kind());
                    None
                }
            };

            episodes.push(Episode::new(
                &channel.name,
                &video.title,
                &video.video_id,
                &video.url,
                &video.published_at,
                &video.description,
                transcript,
            ));
        }

        let transcripts = episodes.iter().filter(|e| e.has_transcript).count();
        info!(videos = episodes.len(), transcripts, "Channel fetched");

        ChannelFetch {
            report: report(ChannelOutcome::Fetched {
                videos: episodes.len(),
                transcripts,
            }),
            episodes,
        }
    }

    async fn resolve_channel(&self, channel: &ChannelConfig) -> Result<Option<String>> {
        match (&channel.channel_id, &channel.handle) {
            (Some(id), _) => Ok(Some(id.clone())),
            (None, Some(handle)) => self.platform.search_channel_id(handle).await,
            (None, None) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DigestError;
    use crate::transcript::TranscriptError;
    use crate::youtube::PlaylistVideo;
    use async_trait::async_trait;
    use std::collections::HashMap;

    fn recent_ts() -> String {
        (chrono::Utc::now() - chrono::Duration::days(1)).to_rfc3339()
    }

    struct FakePlatform {
        /// handle -> channel id
        handles: HashMap<String, String>,
        /// channel id -> playlist id
        playlists: HashMap<String, String>,
        /// playlist id -> entries
        items: HashMap<String, Vec<PlaylistVideo>>,
        /// playlist ids whose listing call fails
        broken_playlists: Vec<String>,
    }

    impl FakePlatform {
        fn new() -> Self {
            Self {
                handles: HashMap::new(),
                playlists: HashMap::new(),
                items: HashMap::new(),
                broken_playlists: Vec::new(),
            }
        }

        fn add_channel(&mut self, handle: &str, channel_id: &str, playlist_id: &str) {
            self.handles.insert(handle.to_string(), channel_id.to_string());
            self.playlists
                .insert(channel_id.to_string(), playlist_id.to_string());
            self.items.insert(playlist_id.to_string(), Vec::new());
        }

        fn add_video(&mut self, playlist_id: &str, video_id: &str, title: &str) {
            self.items
                .get_mut(playlist_id)
                .unwrap()
                .push(PlaylistVideo {
                    video_id: video_id.to_string(),
                    title: title.to_string(),
                    published_at: recent_ts(),
                    description: String::new(),
                });
        }
    }

    #[async_trait]
    impl VideoPlatform for FakePlatform {
        async fn search_channel_id(&self, handle: &str) -> Result<Option<String>> {
            Ok(self.handles.get(handle).cloned())
        }

        async fn uploads_playlist_id(&self, channel_id: &str) -> Result<Option<String>> {
            Ok(self.playlists.get(channel_id).cloned())
        }

        async fn playlist_items(
            &self,
            playlist_id: &str,
            _max_results: u32,
        ) -> Result<Vec<PlaylistVideo>> {
            if self.broken_playlists.iter().any(|p| p == playlist_id) {
                return Err(DigestError::Api("listing failed".to_string()));
            }
            Ok(self.items.get(playlist_id).cloned().unwrap_or_default())
        }
    }

    struct FakeTranscripts {
        /// video id -> transcript; missing means no transcript
        by_video: HashMap<String, String>,
        /// video ids whose fetch errors out
        broken: Vec<String>,
    }

    #[async_trait]
    impl TranscriptSource for FakeTranscripts {
        async fn fetch(
            &self,
            video_id: &str,
        ) -> std::result::Result<Option<String>, TranscriptError> {
            if self.broken.iter().any(|v| v == video_id) {
                return Err(TranscriptError::Malformed("boom".to_string()));
            }
            Ok(self.by_video.get(video_id).cloned())
        }
    }

    fn settings_with(channels: Vec<ChannelConfig>) -> Settings {
        Settings {
            channels,
            ..Settings::default()
        }
    }

    fn fetcher(
        platform: FakePlatform,
        transcripts: FakeTranscripts,
        channels: Vec<ChannelConfig>,
    ) -> Fetcher {
        Fetcher::with_components(
            settings_with(channels),
            Arc::new(platform),
            Arc::new(transcripts),
        )
    }

    #[tokio::test]
    async fn test_full_run_preserves_order_and_flags() {
        let mut platform = FakePlatform::new();
        platform.add_channel("podone", "UC1", "PL1");
        platform.add_video("PL1", "vid00000001", "First channel episode one");
        platform.add_video("PL1", "vid00000002", "First channel episode two");
        platform.add_channel("podtwo", "UC2", "PL2");
        platform.add_video("PL2", "vid00000003", "Second channel episode one");

        let transcripts = FakeTranscripts {
            by_video: HashMap::from([
                ("vid00000001".to_string(), "a transcript".to_string()),
                ("vid00000003".to_string(), "another transcript".to_string()),
            ]),
            broken: Vec::new(),
        };

        let fetcher = fetcher(
            platform,
            transcripts,
            vec![
                ChannelConfig::with_handle("Pod One", "podone"),
                ChannelConfig::with_handle("Pod Two", "podtwo"),
            ],
        );

        let run = fetcher.fetch_all().await;
        assert_eq!(run.total(), 3);
        assert_eq!(run.with_transcript(), 2);
        assert_eq!(run.podcast_count(), 2);

        let ids: Vec<_> = run.episodes.iter().map(|e| e.video_id.as_str()).collect();
        assert_eq!(ids, vec!["vid00000001", "vid00000002", "vid00000003"]);

        for ep in &run.episodes {
            assert_eq!(ep.has_transcript, ep.transcript.is_some());
        }
        assert!(!run.episodes[1].has_transcript);
    }

    #[tokio::test]
    async fn test_unknown_handle_skips_channel_and_continues() {
        let mut platform = FakePlatform::new();
        platform.add_channel("known", "UC1", "PL1");
        platform.add_video("PL1", "vid00000001", "An episode that survives");

        let transcripts = FakeTranscripts {
            by_video: HashMap::new(),
            broken: Vec::new(),
        };

        let fetcher = fetcher(
            platform,
            transcripts,
            vec![
                ChannelConfig::with_handle("Ghost", "missing"),
                ChannelConfig::with_handle("Known", "known"),
            ],
        );

        let run = fetcher.fetch_all().await;
        assert_eq!(run.total(), 1);
        assert_eq!(
            run.reports[0].outcome,
            ChannelOutcome::Skipped(SkipReason::ChannelNotFound)
        );
        assert!(matches!(
            run.reports[1].outcome,
            ChannelOutcome::Fetched { videos: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_direct_channel_id_skips_search() {
        let mut platform = FakePlatform::new();
        // No handle registered; only the id -> playlist mapping exists.
        platform
            .playlists
            .insert("UCdirect".to_string(), "PLd".to_string());
        platform.items.insert("PLd".to_string(), Vec::new());

        let transcripts = FakeTranscripts {
            by_video: HashMap::new(),
            broken: Vec::new(),
        };

        let fetcher = fetcher(
            platform,
            transcripts,
            vec![ChannelConfig::with_id("Direct", "UCdirect")],
        );

        let run = fetcher.fetch_all().await;
        assert_eq!(run.reports[0].outcome, ChannelOutcome::NoNewVideos);
    }

    #[tokio::test]
    async fn test_transcript_error_recorded_as_absence() {
        let mut platform = FakePlatform::new();
        platform.add_channel("pod", "UC1", "PL1");
        platform.add_video("PL1", "vid00000001", "Episode with broken captions");

        let transcripts = FakeTranscripts {
            by_video: HashMap::new(),
            broken: vec!["vid00000001".to_string()],
        };

        let fetcher = fetcher(
            platform,
            transcripts,
            vec![ChannelConfig::with_handle("Pod", "pod")],
        );

        let run = fetcher.fetch_all().await;
        assert_eq!(run.total(), 1);
        assert!(!run.episodes[0].has_transcript);
        assert!(run.episodes[0].transcript.is_none());
    }

    #[tokio::test]
    async fn test_empty_transcript_counts_as_absent() {
        let mut platform = FakePlatform::new();
        platform.add_channel("pod", "UC1", "PL1");
        platform.add_video("PL1", "vid00000001", "Episode with silent captions");

        let transcripts = FakeTranscripts {
            by_video: HashMap::from([("vid00000001".to_string(), String::new())]),
            broken: Vec::new(),
        };

        let fetcher = fetcher(
            platform,
            transcripts,
            vec![ChannelConfig::with_handle("Pod", "pod")],
        );

        let run = fetcher.fetch_all().await;
        assert!(!run.episodes[0].has_transcript);
    }

    #[tokio::test]
    async fn test_playlist_listing_failure_skips_with_reason() {
        let mut platform = FakePlatform::new();
        platform.add_channel("pod", "UC1", "PL1");
        platform.broken_playlists.push("PL1".to_string());

        let transcripts = FakeTranscripts {
            by_video: HashMap::new(),
            broken: Vec::new(),
        };

        let fetcher = fetcher(
            platform,
            transcripts,
            vec![ChannelConfig::with_handle("Pod", "pod")],
        );

        let run = fetcher.fetch_all().await;
        assert!(run.episodes.is_empty());
        match &run.reports[0].outcome {
            ChannelOutcome::Skipped(SkipReason::ApiError(msg)) => {
                assert!(msg.contains("listing failed"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
