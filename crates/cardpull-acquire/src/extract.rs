use crate::config::ExtractConfig;
use crate::download::save_image;
use crate::http::HttpClient;
use crate::layout::{prepare, reset};
use crate::locate::locate;
use crate::output::{write_payload, write_text};
use crate::pipeline::run_tracks;
use anyhow::{Context, Result};
use cardpull_model::normalize;
use cardpull_render::{render_card_metadata, render_track_details};
use std::sync::Arc;

/// Counts from a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub tracks: usize,
    pub audio_saved: usize,
    pub audio_failed: usize,
    pub icons_saved: usize,
    pub icons_failed: usize,
    pub icons_missing: usize,
    pub artwork_saved: bool,
}

/// Fetch the card at `config.url` and materialize it under `config.output_dir`.
///
/// Fails only if no card can be obtained or a report cannot be written.
/// Artwork, audio and icon failures are logged and counted.
pub async fn extract(client: Arc<dyn HttpClient>, config: &ExtractConfig) -> Result<ExtractSummary> {
    let doc = locate(client.as_ref(), &config.url)
        .await
        .with_context(|| format!("Failed to locate card payload at {}", config.url))?;
    let payload = config.keep_payload.then(|| doc.clone());
    let card = normalize(doc).context("Failed to read card from payload")?;
    tracing::info!(
        title = card.title.as_deref().unwrap_or("untitled"),
        chapters = card.chapters().len(),
        tracks = card.track_count(),
        "Found card"
    );

    let layout = prepare(&config.output_dir).context("Failed to create output directories")?;
    reset(&layout).context("Failed to clear previous output")?;

    if let Some(payload) = &payload {
        write_payload(&layout, payload, &config.url, &card)
            .context("Failed to write payload archive")?;
    }

    let artwork_saved = match card.cover_url() {
        Some(url) => match save_image(client.as_ref(), url, &layout.artwork_path()).await {
            Ok(path) => {
                tracing::info!(path = %path.display(), "Saved artwork");
                true
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "Artwork download failed");
                false
            }
        },
        None => {
            tracing::info!("Card has no cover image");
            false
        }
    };

    write_text(&layout.metadata_path(), &render_card_metadata(&card))
        .context("Failed to write metadata")?;

    let result = run_tracks(Arc::clone(&client), &layout, &card, config.concurrency).await;

    write_text(
        &layout.track_details_path(),
        &render_track_details(&card, &result.reports),
    )
    .context("Failed to write track details")?;

    let summary = ExtractSummary {
        tracks: result.reports.len(),
        audio_saved: result.audio_saved,
        audio_failed: result.audio_failed,
        icons_saved: result.icons_saved,
        icons_failed: result.icons_failed,
        icons_missing: result.icons_missing,
        artwork_saved,
    };
    tracing::info!(
        tracks = summary.tracks,
        audio_saved = summary.audio_saved,
        audio_failed = summary.audio_failed,
        icons_saved = summary.icons_saved,
        icons_failed = summary.icons_failed,
        path = %layout.root().display(),
        "Extraction complete"
    );
    Ok(summary)
}
