//! Transcript retrieval and cleanup.
//!
//! The pipeline depends on the [`TranscriptSource`] trait; [`CaptionClient`]
//! is the real implementation over YouTube's caption tracks. Absence of a
//! transcript is a normal outcome (`Ok(None)`), not an error.

mod client;

pub use client::CaptionClient;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

/// Failure while talking to the transcript provider. Absence of a
/// transcript is not an error; see [`TranscriptSource::fetch`].
#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed caption payload: {0}")]
    Malformed(String),
}

impl TranscriptError {
    /// Short category name for operator-facing logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TranscriptError::Http(_) => "Http",
            TranscriptError::Malformed(_) => "Malformed",
        }
    }
}

/// Source of video transcripts.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the cleaned transcript for a video.
    ///
    /// `Ok(None)` means no transcript exists or transcripts are disabled
    /// for the video. The returned text may be empty after cleaning.
    async fn fetch(&self, video_id: &str) -> Result<Option<String>, TranscriptError>;
}

/// Strip caption artifacts and normalize whitespace.
///
/// Removes `[Music]` and `[Applause]` markers case-insensitively, collapses
/// whitespace runs to single spaces, and trims.
pub fn clean_transcript(text: &str) -> String {
    let artifacts = Regex::new(r"(?i)\[(?:music|applause)\]").expect("Invalid regex");
    let whitespace = Regex::new(r"\s+").expect("Invalid regex");

    let stripped = artifacts.replace_all(text, "");
    whitespace.replace_all(&stripped, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_artifacts_case_insensitively() {
        let cleaned = clean_transcript("welcome [Music] back [APPLAUSE] everyone [music]");
        assert_eq!(cleaned, "welcome back everyone");
    }

    #[test]
    fn test_collapses_whitespace_and_trims() {
        let cleaned = clean_transcript("  so\n\nthe   thing\tis ");
        assert_eq!(cleaned, "so the thing is");
    }

    #[test]
    fn test_all_artifacts_yields_empty() {
        assert_eq!(clean_transcript("[Music] [Applause]"), "");
    }

    #[test]
    fn test_error_kinds() {
        let err = TranscriptError::Malformed("bad".to_string());
        assert_eq!(err.kind(), "Malformed");
    }
}
