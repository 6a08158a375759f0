//! Recent-video filtering and short-form exclusion.
//!
//! Pure functions over playlist entries; the clock is injected so the date
//! window is testable.

use crate::config::FetchSettings;
use crate::youtube::PlaylistVideo;
use chrono::{DateTime, Duration, NaiveDateTime};

/// A playlist entry that survived filtering, ready for transcript fetch.
#[derive(Debug, Clone)]
pub struct VideoCandidate {
    pub video_id: String,
    pub title: String,
    pub published_at: String,
    /// Description truncated to the configured limit.
    pub description: String,
    /// Canonical watch URL.
    pub url: String,
}

/// Keep entries published within the lookback window that don't look like
/// short-form videos, in input order, stopping at `max_per_channel`.
///
/// Entries with unparsable publish timestamps are dropped silently.
pub fn recent_videos(
    entries: &[PlaylistVideo],
    settings: &FetchSettings,
    now: NaiveDateTime,
) -> Vec<VideoCandidate> {
    let cutoff = now - Duration::days(settings.days);
    let marker = settings.shorts_marker.to_lowercase();
    let mut kept = Vec::new();

    for entry in entries {
        let published = match DateTime::parse_from_rfc3339(&entry.published_at) {
            Ok(dt) => dt.naive_utc(),
            Err(_) => continue,
        };

        if published < cutoff {
            continue;
        }

        if entry.title.to_lowercase().contains(&marker)
            || entry.description.to_lowercase().contains(&marker)
        {
            continue;
        }

        if entry.description.contains(&settings.shorts_path_marker) {
            continue;
        }

        if entry.title.chars().count() < settings.min_title_len {
            continue;
        }

        kept.push(VideoCandidate {
            video_id: entry.video_id.clone(),
            title: entry.title.clone(),
            published_at: entry.published_at.clone(),
            description: truncate_chars(&entry.description, settings.description_limit),
            url: format!("https://www.youtube.com/watch?v={}", entry.video_id),
        });

        if kept.len() >= settings.max_per_channel {
            break;
        }
    }

    kept
}

/// Playlist page size: fetch extra entries to survive filtering, capped at
/// the API's 50-item page ceiling.
pub fn page_size(max_per_channel: usize) -> u32 {
    (max_per_channel * 2).min(50) as u32
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn entry(video_id: &str, title: &str, published_at: &str, description: &str) -> PlaylistVideo {
        PlaylistVideo {
            video_id: video_id.to_string(),
            title: title.to_string(),
            published_at: published_at.to_string(),
            description: description.to_string(),
        }
    }

    fn settings() -> FetchSettings {
        FetchSettings::default()
    }

    #[test]
    fn test_keeps_recent_and_drops_old() {
        let entries = vec![
            entry("aaaaaaaaaaa", "Fresh interview episode", "2024-06-14T08:00:00Z", ""),
            entry("bbbbbbbbbbb", "Stale interview episode", "2024-05-01T08:00:00Z", ""),
        ];
        let kept = recent_videos(&entries, &settings(), now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].video_id, "aaaaaaaaaaa");
        assert_eq!(kept[0].url, "https://www.youtube.com/watch?v=aaaaaaaaaaa");
    }

    #[test]
    fn test_unparsable_date_excluded_silently() {
        let entries = vec![
            entry("aaaaaaaaaaa", "Valid date episode here", "2024-06-14T08:00:00Z", ""),
            entry("bbbbbbbbbbb", "Broken date episode here", "not-a-date", ""),
            entry("ccccccccccc", "Missing date episode here", "", ""),
        ];
        let kept = recent_videos(&entries, &settings(), now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].video_id, "aaaaaaaaaaa");
    }

    #[test]
    fn test_shorts_marker_excludes_case_insensitively() {
        let entries = vec![
            entry("aaaaaaaaaaa", "Quick clip #ShOrTs today", "2024-06-14T08:00:00Z", ""),
            entry("bbbbbbbbbbb", "A normal length episode", "2024-06-14T08:00:00Z", "watch more #SHORTS"),
            entry("ccccccccccc", "Linked clip episode here", "2024-06-14T08:00:00Z", "see youtube.com/shorts/xyz"),
            entry("ddddddddddd", "A real full episode here", "2024-06-14T08:00:00Z", "show notes"),
        ];
        let kept = recent_videos(&entries, &settings(), now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].video_id, "ddddddddddd");
    }

    #[test]
    fn test_short_title_excluded() {
        let entries = vec![
            entry("aaaaaaaaaaa", "Teaser", "2024-06-14T08:00:00Z", ""),
            entry("bbbbbbbbbbb", "A properly titled episode", "2024-06-14T08:00:00Z", ""),
        ];
        let kept = recent_videos(&entries, &settings(), now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].video_id, "bbbbbbbbbbb");
    }

    #[test]
    fn test_cap_stops_in_input_order() {
        let entries: Vec<_> = (0..8)
            .map(|i| {
                entry(
                    &format!("{:011}", i),
                    &format!("Episode number {} title", i),
                    "2024-06-14T08:00:00Z",
                    "",
                )
            })
            .collect();
        let mut cfg = settings();
        cfg.max_per_channel = 3;
        let kept = recent_videos(&entries, &cfg, now());
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[0].video_id, "00000000000");
        assert_eq!(kept[2].video_id, "00000000002");
    }

    #[test]
    fn test_description_truncated_to_limit() {
        let long_desc = "x".repeat(900);
        let entries = vec![entry(
            "aaaaaaaaaaa",
            "An episode with long notes",
            "2024-06-14T08:00:00Z",
            &long_desc,
        )];
        let kept = recent_videos(&entries, &settings(), now());
        assert_eq!(kept[0].description.chars().count(), 500);
    }

    #[test]
    fn test_window_is_inclusive_at_cutoff() {
        let entries = vec![entry(
            "aaaaaaaaaaa",
            "Exactly at the cutoff edge",
            "2024-06-08T12:00:00Z",
            "",
        )];
        let kept = recent_videos(&entries, &settings(), now());
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_page_size_caps_at_fifty() {
        assert_eq!(page_size(5), 10);
        assert_eq!(page_size(30), 50);
    }
}
