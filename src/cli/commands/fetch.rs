//! Fetch command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::credentials::{CredentialProvider, EnvProvider, PromptProvider};
use crate::fetcher::{ChannelOutcome, FetchRun, Fetcher};
use anyhow::Result;
use std::path::PathBuf;

/// Run the fetch command.
pub async fn run_fetch(
    days: i64,
    max_per_channel: usize,
    output: Option<PathBuf>,
    quiet: bool,
    mut settings: Settings,
) -> Result<()> {
    settings.fetch.days = days;
    settings.fetch.max_per_channel = max_per_channel;

    // Resolve the API key up front; nothing else happens without one.
    let env = EnvProvider::new();
    let prompt = PromptProvider;
    let providers: [&dyn CredentialProvider; 2] = [&env, &prompt];
    let fetcher = Fetcher::new(settings, &providers)?;

    let channels = fetcher.settings().channels.clone();
    Output::info(&format!(
        "Fetching episodes from {} channels (last {} days)...",
        channels.len(),
        days
    ));

    let pb = Output::progress_bar(channels.len() as u64, "fetching");
    let mut run = FetchRun::default();

    for channel in &channels {
        pb.set_message(channel.name.clone());
        let fetched = fetcher.fetch_channel(channel).await;

        match &fetched.report.outcome {
            ChannelOutcome::Fetched { .. } => {
                if !quiet {
                    pb.println(format!("{}:", channel.name));
                    for ep in &fetched.episodes {
                        let title: String = ep.title.chars().take(50).collect();
                        if ep.has_transcript {
                            pb.println(format!(
                                "  + {}... (transcript: {} chars)",
                                title,
                                ep.transcript_len()
                            ));
                        } else {
                            pb.println(format!("  + {}... (no transcript)", title));
                        }
                    }
                }
            }
            ChannelOutcome::NoNewVideos => {
                if !quiet {
                    pb.println(format!("{}: (no new episodes)", channel.name));
                }
            }
            ChannelOutcome::Skipped(reason) => {
                pb.println(format!("{}: skipped - {}", channel.name, reason));
            }
        }

        run.episodes.extend(fetched.episodes);
        run.reports.push(fetched.report);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Output::header("Summary");
    Output::kv("Total episodes found", &run.total().to_string());
    Output::kv("With transcripts", &run.with_transcript().to_string());
    Output::kv("Podcasts covered", &run.podcast_count().to_string());

    let json = serde_json::to_string_pretty(&run.episodes)?;
    match output {
        Some(path) => {
            std::fs::write(&path, &json)?;
            Output::success(&format!("Saved to: {}", path.display()));
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}
