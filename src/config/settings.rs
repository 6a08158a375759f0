//! Configuration settings for poddigest.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{DigestError, Result};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Podcast channels to fetch from, in fetch order.
    pub channels: Vec<ChannelConfig>,
    pub fetch: FetchSettings,
    pub chunking: ChunkSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            fetch: FetchSettings::default(),
            chunking: ChunkSettings::default(),
        }
    }
}

/// A single podcast channel entry.
///
/// Exactly one of `handle` (the public @-handle, without the @) or
/// `channel_id` (the raw UC… identifier) must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Display name used in episode records and console output.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}

impl ChannelConfig {
    /// Channel referenced by public handle.
    pub fn with_handle(name: &str, handle: &str) -> Self {
        Self {
            name: name.to_string(),
            handle: Some(handle.to_string()),
            channel_id: None,
        }
    }

    /// Channel referenced by raw channel ID.
    pub fn with_id(name: &str, channel_id: &str) -> Self {
        Self {
            name: name.to_string(),
            handle: None,
            channel_id: Some(channel_id.to_string()),
        }
    }

    /// Validate the handle/channel_id exclusivity rule.
    pub fn validate(&self) -> Result<()> {
        match (&self.handle, &self.channel_id) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            (Some(_), Some(_)) => Err(DigestError::Config(format!(
                "Channel '{}' sets both handle and channel_id; pick one",
                self.name
            ))),
            (None, None) => Err(DigestError::Config(format!(
                "Channel '{}' needs either a handle or a channel_id",
                self.name
            ))),
        }
    }
}

/// Settings for the fetch pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Days to look back for new episodes.
    pub days: i64,
    /// Maximum videos kept per channel.
    pub max_per_channel: usize,
    /// Marker excluding short-form videos when found in title or description
    /// (matched case-insensitively).
    pub shorts_marker: String,
    /// URL path fragment excluding short-form videos when found in the
    /// description (matched case-sensitively).
    pub shorts_path_marker: String,
    /// Minimum title length in characters; shorter titles are assumed to be
    /// short-form videos.
    pub min_title_len: usize,
    /// Maximum stored description length in characters.
    pub description_limit: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            days: 7,
            max_per_channel: 5,
            shorts_marker: "#shorts".to_string(),
            shorts_path_marker: "/shorts/".to_string(),
            min_title_len: 10,
            description_limit: 500,
        }
    }
}

/// Settings for digest chunk preparation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkSettings {
    /// Transcript length (chars) at or above which an episode gets its own
    /// output file; shorter transcripts are grouped as quick hits.
    pub full_threshold: usize,
    /// Transcript length (chars) above which the transcript is condensed.
    pub condense_threshold: usize,
    /// Characters kept from the start of a condensed transcript.
    pub condense_head: usize,
    /// Characters kept around the midpoint of a condensed transcript.
    pub condense_middle: usize,
    /// Characters kept from the end of a condensed transcript.
    pub condense_tail: usize,
}

impl Default for ChunkSettings {
    fn default() -> Self {
        Self {
            full_threshold: 5000,
            condense_threshold: 50_000,
            condense_head: 20_000,
            condense_middle: 20_000,
            condense_tail: 10_000,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Settings>(&content)?
        } else {
            Settings::default()
        };

        for channel in &settings.channels {
            channel.validate()?;
        }

        Ok(settings)
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| DigestError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("poddigest")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

/// The built-in podcast roster, used when no config file overrides it.
fn default_channels() -> Vec<ChannelConfig> {
    vec![
        ChannelConfig::with_handle("Acquired / ACQ2", "AcquiredFM"),
        ChannelConfig::with_handle("BG²", "Bg2Pod"),
        ChannelConfig::with_handle("Cheeky Pint", "stripe"),
        ChannelConfig::with_handle("David Perell", "davidperell"),
        ChannelConfig::with_handle("Dialectic", "Dialectic"),
        ChannelConfig::with_handle("Dwarkesh Podcast", "DwarkeshPatel"),
        ChannelConfig::with_handle("Founders", "founderspodcast1"),
        ChannelConfig::with_handle("In Depth", "FirstRoundCapital"),
        ChannelConfig::with_handle("Infinite Loops", "infinitel88ps"),
        ChannelConfig::with_handle("Invest Like the Best", "JoinColossus"),
        ChannelConfig::with_handle("Lenny's Podcast", "lennyspodcast"),
        ChannelConfig::with_handle("No Priors", "NoPriorsPodcast"),
        ChannelConfig::with_handle("TBPN", "TBPNLive"),
        ChannelConfig::with_handle("The A16Z Show", "a16z"),
        ChannelConfig::with_handle("TiTV", "theinformation"),
        ChannelConfig::with_handle("The Knowledge Project", "tkppodcast"),
        ChannelConfig::with_id("The Logan Bartlett Show", "UCugS0jD5IAdoqzjaNYzns7w"),
        ChannelConfig::with_handle("The Peel", "ThePeelPod"),
        ChannelConfig::with_handle("20VC", "20vc"),
        ChannelConfig::with_handle("Uncapped", "uncappedpod"),
        ChannelConfig::with_handle("Unsolicited Feedback", "reforgehq"),
        ChannelConfig::with_handle("Y Combinator", "ycombinator"),
        ChannelConfig::with_handle("The Generalist", "TheGeneralistPodcast"),
    ]
}
