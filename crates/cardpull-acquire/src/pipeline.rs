use crate::download::{save_audio, save_image};
use crate::http::HttpClient;
use crate::layout::OutputLayout;
use cardpull_model::{Card, Track};
use cardpull_render::{pad_number, TrackReport};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// A track with its sequence number fixed before any download starts.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTrack {
    /// 1-based position in chapter-then-track order.
    pub sequence: usize,
    /// `sequence` zero-padded to the width of the total track count.
    pub number: String,
    /// 0-based chapter index.
    pub chapter: usize,
    pub track: Track,
    /// Track icon, falling back to the chapter icon.
    pub icon_url: Option<String>,
}

/// What became of one asset of a track.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetStatus {
    /// Written under this file name.
    Saved(String),
    /// Download or write failed.
    Failed(String),
    /// No URL to fetch.
    Missing,
}

impl AssetStatus {
    fn file_name(&self) -> Option<String> {
        match self {
            Self::Saved(name) => Some(name.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct TrackOutcome {
    audio: AssetStatus,
    icon: AssetStatus,
}

/// Reports in sequence order plus per-asset counts.
#[derive(Debug, Clone, Default)]
pub struct PipelineResult {
    pub reports: Vec<TrackReport>,
    pub audio_saved: usize,
    pub audio_failed: usize,
    pub icons_saved: usize,
    pub icons_failed: usize,
    pub icons_missing: usize,
}

/// Number every track of the card in chapter-then-track order.
///
/// The total is counted first so every number shares one padding width.
pub fn plan_tracks(card: &Card) -> Vec<PlannedTrack> {
    let total = card.track_count();
    let mut plan = Vec::with_capacity(total);

    for (chapter_index, chapter) in card.chapters().iter().enumerate() {
        for track in &chapter.tracks {
            let sequence = plan.len() + 1;
            plan.push(PlannedTrack {
                sequence,
                number: pad_number(sequence, total),
                chapter: chapter_index,
                track: track.clone(),
                icon_url: track
                    .icon_url()
                    .or_else(|| chapter.icon_url())
                    .map(str::to_string),
            });
        }
    }

    plan
}

/// Download every track's audio and icon, at most `concurrency` tracks at a time.
///
/// A failure only costs that asset. Every track gets a report, in sequence order,
/// no matter which downloads finish first.
pub async fn run_tracks(
    client: Arc<dyn HttpClient>,
    layout: &OutputLayout,
    card: &Card,
    concurrency: usize,
) -> PipelineResult {
    let plan = plan_tracks(card);
    tracing::info!(tracks = plan.len(), concurrency, "Downloading tracks");

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();
    for planned in plan.iter().cloned() {
        let client = Arc::clone(&client);
        let layout = layout.clone();
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let outcome = process_track(client.as_ref(), &layout, &planned).await;
            (planned.sequence, outcome)
        });
    }

    let mut outcomes: Vec<Option<TrackOutcome>> = vec![None; plan.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((sequence, outcome)) => outcomes[sequence - 1] = Some(outcome),
            Err(e) => tracing::error!(error = %e, "Track task aborted"),
        }
    }

    let mut result = PipelineResult::default();
    for (planned, outcome) in plan.into_iter().zip(outcomes) {
        let outcome = outcome.unwrap_or_else(|| TrackOutcome {
            audio: AssetStatus::Failed("task aborted".into()),
            icon: AssetStatus::Failed("task aborted".into()),
        });
        match outcome.audio {
            AssetStatus::Saved(_) => result.audio_saved += 1,
            _ => result.audio_failed += 1,
        }
        match outcome.icon {
            AssetStatus::Saved(_) => result.icons_saved += 1,
            AssetStatus::Failed(_) => result.icons_failed += 1,
            AssetStatus::Missing => result.icons_missing += 1,
        }
        result.reports.push(TrackReport {
            number: planned.number,
            chapter: planned.chapter,
            audio_file: outcome.audio.file_name(),
            icon_file: outcome.icon.file_name(),
            icon_url: planned.icon_url,
            track: planned.track,
        });
    }

    result
}

async fn process_track(
    client: &dyn HttpClient,
    layout: &OutputLayout,
    planned: &PlannedTrack,
) -> TrackOutcome {
    let number = planned.number.as_str();
    let title = planned.track.title.as_deref().unwrap_or("");

    let audio = match planned.track.audio_url() {
        None => {
            tracing::warn!(track = number, title, "Track has no audio URL");
            AssetStatus::Missing
        }
        Some(url) => match save_audio(client, layout, number, title, url).await {
            Ok(path) => {
                tracing::info!(track = number, path = %path.display(), "Saved track");
                AssetStatus::Saved(file_name(&path))
            }
            Err(e) => {
                tracing::warn!(track = number, title, url, error = %e, "Audio download failed");
                AssetStatus::Failed(e.to_string())
            }
        },
    };

    let icon = match planned.icon_url.as_deref() {
        None => {
            tracing::debug!(track = number, title, "No icon for track");
            AssetStatus::Missing
        }
        Some(url) => match save_image(client, url, &layout.icon_path(number)).await {
            Ok(path) => AssetStatus::Saved(file_name(&path)),
            Err(e) => {
                tracing::warn!(track = number, title, url, error = %e, "Icon download failed");
                AssetStatus::Failed(e.to_string())
            }
        },
    };

    TrackOutcome { audio, icon }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn card(chapters: serde_json::Value) -> Card {
        serde_json::from_value(json!({ "title": "T", "content": { "chapters": chapters } })).unwrap()
    }

    #[test]
    fn test_plan_is_dense_and_ordered() {
        let card = card(json!([
            { "tracks": [ { "title": "a" }, { "title": "b" } ] },
            { "tracks": [] },
            { "tracks": [ { "title": "c" } ] }
        ]));
        let plan = plan_tracks(&card);

        let titles: Vec<_> = plan.iter().map(|p| p.track.title.clone().unwrap()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
        let sequences: Vec<_> = plan.iter().map(|p| p.sequence).collect();
        assert_eq!(sequences, [1, 2, 3]);
        assert_eq!(plan[2].chapter, 2);
    }

    #[test]
    fn test_plan_padding_width() {
        let tracks: Vec<_> = (0..12).map(|i| json!({ "title": format!("t{i}") })).collect();
        let card = card(json!([ { "tracks": tracks } ]));
        let plan = plan_tracks(&card);

        assert_eq!(plan[0].number, "01");
        assert_eq!(plan[11].number, "12");
        assert!(plan.iter().all(|p| p.number.len() == 2));
    }

    #[test]
    fn test_plan_icon_fallback() {
        let card = card(json!([
            {
                "display": { "icon16x16": "https://cdn.example/chapter.png" },
                "tracks": [
                    { "title": "own", "display": { "icon16x16": "https://cdn.example/own.png" } },
                    { "title": "inherits" }
                ]
            },
            { "tracks": [ { "title": "none" } ] }
        ]));
        let plan = plan_tracks(&card);

        assert_eq!(plan[0].icon_url.as_deref(), Some("https://cdn.example/own.png"));
        assert_eq!(plan[1].icon_url.as_deref(), Some("https://cdn.example/chapter.png"));
        assert_eq!(plan[2].icon_url, None);
    }

    #[test]
    fn test_empty_card() {
        assert!(plan_tracks(&Card::default()).is_empty());
    }
}
