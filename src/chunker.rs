//! Digest chunk preparation.
//!
//! Repackages a fetch run's episode list into size-bounded artifacts:
//! one file per long-transcript episode (condensed when overlong), one
//! aggregate file for short "quick hit" transcripts, and a metadata summary.

use crate::config::ChunkSettings;
use crate::episode::Episode;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::path::Path;
use tracing::{debug, info, instrument};

const QUICK_HITS_FILE: &str = "quick_hits_all.json";
const METADATA_FILE: &str = "_metadata.json";

/// One line of the metadata summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Output file name; only set for full episodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Title, truncated to 80 characters.
    pub title: String,
    pub podcast: String,
    /// Original transcript length in characters.
    pub length: usize,
    pub url: String,
}

/// Summary written to `_metadata.json`, rebuilt from scratch every run.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub total_episodes: usize,
    pub full_episodes_count: usize,
    pub quick_hits_count: usize,
    pub full_episodes: Vec<EpisodeSummary>,
    pub quick_hits: Vec<EpisodeSummary>,
}

/// A full episode as written to its own output file. Condensed transcripts
/// carry the original length and a note alongside the base record.
#[derive(Debug, Serialize, Deserialize)]
pub struct FullEpisodeRecord {
    #[serde(flatten)]
    pub episode: Episode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_original_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Partition, condense, and write all chunk artifacts into `output_dir`.
///
/// Episodes without transcripts are counted in the total but produce no
/// artifact. Stale `episode_*.json` files from earlier runs are deleted
/// before anything is written.
#[instrument(skip(episodes, settings), fields(episodes = episodes.len()))]
pub fn prepare_chunks(
    episodes: &[Episode],
    output_dir: &Path,
    settings: &ChunkSettings,
) -> Result<ChunkMetadata> {
    std::fs::create_dir_all(output_dir)?;
    remove_stale_chunks(output_dir)?;

    let mut full_episodes: Vec<&Episode> = Vec::new();
    let mut quick_hits: Vec<&Episode> = Vec::new();

    for ep in episodes {
        if !ep.has_transcript {
            continue;
        }
        let len = ep.transcript_len();
        if len >= settings.full_threshold {
            full_episodes.push(ep);
        } else if len > 0 {
            quick_hits.push(ep);
        }
    }

    // Longest first; stable, so equal lengths keep fetch order.
    full_episodes.sort_by_key(|ep| Reverse(ep.transcript_len()));
    quick_hits.sort_by_key(|ep| Reverse(ep.transcript_len()));

    let mut metadata = ChunkMetadata {
        total_episodes: episodes.len(),
        full_episodes_count: full_episodes.len(),
        quick_hits_count: quick_hits.len(),
        full_episodes: Vec::with_capacity(full_episodes.len()),
        quick_hits: Vec::with_capacity(quick_hits.len()),
    };

    for (rank, ep) in full_episodes.iter().enumerate() {
        let length = ep.transcript_len();
        let record = full_record(ep, settings);

        let filename = format!("episode_{:02}_full.json", rank + 1);
        let path = output_dir.join(&filename);
        std::fs::write(&path, serde_json::to_string_pretty(&record)?)?;
        debug!(file = %filename, length, "Wrote full episode");

        metadata.full_episodes.push(EpisodeSummary {
            file: Some(filename),
            title: title_prefix(&ep.title),
            podcast: ep.podcast.clone(),
            length,
            url: ep.url.clone(),
        });
    }

    if !quick_hits.is_empty() {
        std::fs::write(
            output_dir.join(QUICK_HITS_FILE),
            serde_json::to_string_pretty(&quick_hits)?,
        )?;

        for ep in &quick_hits {
            metadata.quick_hits.push(EpisodeSummary {
                file: None,
                title: title_prefix(&ep.title),
                podcast: ep.podcast.clone(),
                length: ep.transcript_len(),
                url: ep.url.clone(),
            });
        }
    }

    std::fs::write(
        output_dir.join(METADATA_FILE),
        serde_json::to_string_pretty(&metadata)?,
    )?;

    info!(
        full = metadata.full_episodes_count,
        quick = metadata.quick_hits_count,
        "Chunks prepared"
    );

    Ok(metadata)
}

/// Build the on-disk record for a full episode, condensing overlong
/// transcripts.
fn full_record(ep: &Episode, settings: &ChunkSettings) -> FullEpisodeRecord {
    let length = ep.transcript_len();
    let transcript = ep.transcript.as_deref().unwrap_or_default();

    if length <= settings.condense_threshold {
        return FullEpisodeRecord {
            episode: ep.clone(),
            transcript_original_length: None,
            note: None,
        };
    }

    let mut condensed_ep = ep.clone();
    condensed_ep.transcript = Some(condense(transcript, settings));

    FullEpisodeRecord {
        episode: condensed_ep,
        transcript_original_length: Some(length),
        note: Some(format!(
            "Transcript condensed from {} to ~{} chars",
            thousands(length),
            thousands(settings.condense_head + settings.condense_middle + settings.condense_tail)
        )),
    }
}

/// Head + mid-window + tail representation of an overlong transcript.
/// All offsets are in characters.
fn condense(transcript: &str, settings: &ChunkSettings) -> String {
    let chars: Vec<char> = transcript.chars().collect();
    let len = chars.len();
    let mid = len / 2;

    let head: String = chars[..settings.condense_head.min(len)].iter().collect();
    let mid_start = mid.saturating_sub(settings.condense_middle / 2);
    let mid_end = (mid + settings.condense_middle - settings.condense_middle / 2).min(len);
    let middle: String = chars[mid_start..mid_end].iter().collect();
    let tail: String = chars[len.saturating_sub(settings.condense_tail)..]
        .iter()
        .collect();

    format!(
        "{}\n\n[...MIDDLE SECTION OMITTED...]\n\n{}\n\n[...SECTION OMITTED...]\n\n{}",
        head, middle, tail
    )
}

/// Delete per-episode output files left over from a previous run.
fn remove_stale_chunks(dir: &Path) -> Result<()> {
    for entry in std::fs::read_dir(dir)?.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("episode_") && name.ends_with(".json") {
            debug!(file = %name, "Removing stale chunk");
            std::fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

fn title_prefix(title: &str) -> String {
    title.chars().take(80).collect()
}

/// Format a count with thousands separators (12345 -> "12,345").
fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
