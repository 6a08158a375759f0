//! API credential resolution.
//!
//! The fetch pipeline needs a YouTube Data API key before any network call.
//! Lookup goes through the [`CredentialProvider`] seam so the interactive
//! prompt stays out of the orchestration logic (and out of tests).

use crate::error::{DigestError, Result};
use console::style;
use std::io::Write;

/// A single place an API key might come from.
pub trait CredentialProvider {
    /// Try to produce a key. `Ok(None)` means this provider has nothing;
    /// the caller moves on to the next one.
    fn api_key(&self) -> Result<Option<String>>;
}

/// Walk the provider chain; the first key wins. No key anywhere is fatal.
pub fn resolve_api_key(providers: &[&dyn CredentialProvider]) -> Result<String> {
    for provider in providers {
        if let Some(key) = provider.api_key()? {
            return Ok(key);
        }
    }
    Err(DigestError::MissingCredential)
}

/// Reads the key from an environment variable (default `YOUTUBE_API_KEY`).
pub struct EnvProvider {
    var: String,
}

impl EnvProvider {
    pub fn new() -> Self {
        Self::with_var("YOUTUBE_API_KEY")
    }

    pub fn with_var(var: &str) -> Self {
        Self {
            var: var.to_string(),
        }
    }
}

impl Default for EnvProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for EnvProvider {
    fn api_key(&self) -> Result<Option<String>> {
        match std::env::var(&self.var) {
            Ok(key) if !key.trim().is_empty() => Ok(Some(key.trim().to_string())),
            _ => Ok(None),
        }
    }
}

/// Asks for the key on the terminal, with setup instructions.
pub struct PromptProvider;

impl CredentialProvider for PromptProvider {
    fn api_key(&self) -> Result<Option<String>> {
        eprintln!();
        eprintln!("{}", style("YOUTUBE API KEY REQUIRED").bold());
        eprintln!(
            "\nTo fetch videos from YouTube channels, you need a free API key.\n\n\
             How to get one (takes 2 minutes):\n\
             1. Go to: https://console.cloud.google.com/\n\
             2. Create a new project (or select existing)\n\
             3. Search for \"YouTube Data API v3\" and enable it\n\
             4. Go to \"Credentials\" -> \"Create Credentials\" -> \"API Key\"\n\
             5. Copy the key\n\n\
             Then either:\n\
             - Set environment variable: export YOUTUBE_API_KEY=your_key_here\n\
             - Or paste it below when prompted\n"
        );
        eprint!("Paste your YouTube API key: ");
        std::io::stderr().flush()?;

        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;

        let key = line.trim();
        if key.is_empty() {
            Ok(None)
        } else {
            Ok(Some(key.to_string()))
        }
    }
}
