//! Chunk command implementation.

use crate::chunker::prepare_chunks;
use crate::cli::Output;
use crate::config::Settings;
use crate::episode::Episode;
use anyhow::{Context, Result};

/// Run the chunk command.
pub fn run_chunk(input: &str, output_dir: &str, settings: Settings) -> Result<()> {
    let input = Settings::expand_path(input);
    let output_dir = Settings::expand_path(output_dir);

    Output::info(&format!("Reading: {}", input.display()));
    Output::info(&format!("Output to: {}", output_dir.display()));

    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("Cannot read input file {}", input.display()))?;
    let episodes: Vec<Episode> = serde_json::from_str(&content)
        .with_context(|| format!("Malformed episode JSON in {}", input.display()))?;

    let metadata = prepare_chunks(&episodes, &output_dir, &settings.chunking)?;

    Output::success("Chunks prepared!");
    Output::header("Summary");
    Output::kv("Total episodes", &metadata.total_episodes.to_string());
    Output::kv("Full episodes", &metadata.full_episodes_count.to_string());
    Output::kv("Quick hits", &metadata.quick_hits_count.to_string());

    Output::header(&format!("Files created in: {}", output_dir.display()));
    Output::list_item("_metadata.json (overview)");
    for summary in &metadata.full_episodes {
        if let Some(file) = &summary.file {
            Output::list_item(&format!("{} ({} chars)", file, summary.length));
        }
    }
    if metadata.quick_hits_count > 0 {
        Output::list_item(&format!(
            "quick_hits_all.json ({} episodes)",
            metadata.quick_hits_count
        ));
    }

    Ok(())
}
