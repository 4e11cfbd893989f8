use crate::layout::OutputLayout;
use cardpull_model::{Card, ExtractError};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Write a text file, replacing any previous contents.
pub fn write_text(path: &Path, contents: &str) -> Result<(), ExtractError> {
    fs::write(path, contents).map_err(|e| ExtractError::filesystem(path, e))?;
    tracing::info!(path = %path.display(), lines = contents.lines().count(), "Wrote report");
    Ok(())
}

/// Archive the located payload as `payload.json` plus a `source.md` provenance note.
pub fn write_payload(
    layout: &OutputLayout,
    payload: &Value,
    url: &str,
    card: &Card,
) -> Result<(), ExtractError> {
    let path = layout.payload_path();
    let json = serde_json::to_string_pretty(payload)
        .map_err(|e| ExtractError::Parse(format!("payload could not be serialized: {e}")))?;
    fs::write(&path, &json).map_err(|e| ExtractError::filesystem(&path, e))?;
    tracing::info!(path = %path.display(), bytes = json.len(), "Wrote payload JSON");

    let path = layout.source_path();
    let fetched_at = chrono::Utc::now().to_rfc3339();
    fs::write(&path, source_md(url, &fetched_at, card))
        .map_err(|e| ExtractError::filesystem(&path, e))?;
    tracing::info!(path = %path.display(), "Wrote source provenance");

    Ok(())
}

fn source_md(url: &str, fetched_at: &str, card: &Card) -> String {
    format!(
        "# Source\n\n\
         - **URL:** {}\n\
         - **Fetched:** {}\n\
         - **Card ID:** {}\n\
         - **Title:** {}\n\
         - **Chapters:** {}\n\
         - **Tracks:** {}\n",
        url,
        fetched_at,
        card.card_id.as_deref().unwrap_or(cardpull_render::UNDEFINED),
        card.title.as_deref().unwrap_or(cardpull_render::UNDEFINED),
        card.chapters().len(),
        card.track_count(),
    )
}
