//! Error types for poddigest.

use thiserror::Error;

/// Library-level error type for poddigest operations.
#[derive(Error, Debug)]
pub enum DigestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No YouTube API key provided. Set YOUTUBE_API_KEY or enter one at the prompt.")]
    MissingCredential,

    #[error("YouTube API error: {0}")]
    Api(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for poddigest operations.
pub type Result<T> = std::result::Result<T, DigestError>;
