use crate::format::{convert_bytes, convert_seconds};
use cardpull_model::{Card, Track};
use serde_json::Value;
use std::fmt::Write;

/// Placeholder written for every absent field.
pub const UNDEFINED: &str = "__undefined__";

/// One track's line in `track-details.txt`, with whatever the pipeline produced for it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackReport {
    /// Zero-padded sequence number, e.g. `"007"`.
    pub number: String,
    pub chapter: usize,
    pub track: Track,
    /// Track icon, or the chapter icon when the track has none.
    pub icon_url: Option<String>,
    /// File name under `tracks/` once the audio was saved.
    pub audio_file: Option<String>,
    /// File name under `icons/` once the icon was saved.
    pub icon_file: Option<String>,
}

/// Render `metadata.txt`.
pub fn render_card_metadata(card: &Card) -> String {
    let media = card.metadata.media.clone().unwrap_or_default();
    let mut out = String::new();

    heading(&mut out, "Card Metadata", '=');
    line(&mut out, "Title", card.title.as_deref());
    line(&mut out, "Author", Some(card.author()));
    line(&mut out, "Description", card.metadata.description.as_deref());
    line(&mut out, "Category", card.metadata.category.as_deref());
    line(
        &mut out,
        "Languages",
        card.metadata.languages.as_ref().map(|l| l.join(", ")).as_deref(),
    );
    line(&mut out, "Playback Type", card.playback_type());
    line(&mut out, "Card ID", card.card_id.as_deref());
    line(&mut out, "Slug", card.slug.as_deref());
    line(&mut out, "Created At", card.created_at.as_ref().map(verbatim).as_deref());
    line(&mut out, "Updated At", card.updated_at.as_ref().map(verbatim).as_deref());
    line(&mut out, "Share Count", card.share_count.map(|n| n.to_string()).as_deref());
    line(&mut out, "Share Link URL", card.share_link_url.as_deref());
    line(&mut out, "Availability", card.availability.as_deref());
    line(
        &mut out,
        "Content Version",
        card.content.version.as_ref().map(verbatim).as_deref(),
    );
    line(&mut out, "Cover Image", card.cover_url());
    out.push('\n');

    heading(&mut out, "Media", '-');
    duration_lines(&mut out, "", media.duration);
    size_lines(&mut out, "", media.file_size);
    out.push('\n');

    heading(&mut out, "Contents", '-');
    line(&mut out, "Chapters", Some(card.chapters().len().to_string().as_str()));
    line(&mut out, "Tracks", Some(card.track_count().to_string().as_str()));

    out
}

/// Render `track-details.txt` from the reports in sequence order.
pub fn render_track_details(card: &Card, sequence: &[TrackReport]) -> String {
    let mut out = String::new();
    heading(
        &mut out,
        &format!("Track Details: {}", non_empty(card.title.as_deref())),
        '=',
    );
    line(&mut out, "Total Tracks", Some(sequence.len().to_string().as_str()));

    for report in sequence {
        let track = &report.track;
        out.push('\n');
        let _ = writeln!(
            out,
            "[{}] {}",
            report.number,
            non_empty(track.title.as_deref())
        );
        line(&mut out, "  Chapter", Some((report.chapter + 1).to_string().as_str()));
        line(&mut out, "  Type", track.kind.as_deref());
        duration_lines(&mut out, "  ", track.duration);
        size_lines(&mut out, "  ", track.file_size);
        line(&mut out, "  Channels", track.channels.as_ref().map(verbatim).as_deref());
        line(&mut out, "  Format", track.format.as_deref());
        line(&mut out, "  Track URL", track.audio_url());
        line(&mut out, "  Icon URL", report.icon_url.as_deref());
        line(&mut out, "  Audio File", report.audio_file.as_deref());
        line(&mut out, "  Icon File", report.icon_file.as_deref());
    }

    out
}

fn heading(out: &mut String, title: &str, underline: char) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", underline.to_string().repeat(title.chars().count()));
}

/// Absent and empty values both render as the placeholder.
fn line(out: &mut String, label: &str, value: Option<&str>) {
    let _ = writeln!(out, "{label}: {}", non_empty(value));
}

fn duration_lines(out: &mut String, indent: &str, seconds: Option<u64>) {
    let raw = seconds.map(|s| s.to_string());
    line(out, &format!("{indent}Duration (seconds)"), raw.as_deref());
    line(out, &format!("{indent}Duration"), seconds.map(convert_seconds).as_deref());
}

fn size_lines(out: &mut String, indent: &str, bytes: Option<u64>) {
    let raw = bytes.map(|b| b.to_string());
    line(out, &format!("{indent}File Size (bytes)"), raw.as_deref());
    line(out, &format!("{indent}File Size"), bytes.map(convert_bytes).as_deref());
}

fn non_empty(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(UNDEFINED)
}

/// Opaque JSON values render as-is; strings without quotes, null as the placeholder.
fn verbatim(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => UNDEFINED.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardpull_model::{CardMetadata, Media};
    use serde_json::json;

    #[test]
    fn test_missing_fields_render_placeholder() {
        let text = render_card_metadata(&Card::default());

        assert!(text.contains("Title: __undefined__\n"));
        assert!(text.contains("Author: MYO\n"));
        assert!(text.contains("Languages: __undefined__\n"));
        assert!(text.contains("Created At: __undefined__\n"));
        assert!(text.contains("Duration (seconds): __undefined__\n"));
        assert!(text.contains("File Size: __undefined__\n"));
        assert!(text.contains("Tracks: 0\n"));
        assert!(!text.contains(": \n"));
    }

    #[test]
    fn test_empty_fields_render_placeholder() {
        let card: Card = serde_json::from_value(json!({
            "title": "",
            "slug": "  ",
            "metadata": { "languages": [], "description": "" }
        }))
        .unwrap();
        let text = render_card_metadata(&card);

        assert!(text.contains("Title: __undefined__\n"));
        assert!(text.contains("Slug: __undefined__\n"));
        assert!(text.contains("Description: __undefined__\n"));
        assert!(text.contains("Languages: __undefined__\n"));
        assert!(!text.contains(": \n"));

        let details = render_track_details(&card, &[]);
        assert!(details.starts_with("Track Details: __undefined__\n"));
    }

    #[test]
    fn test_card_metadata_values() {
        let card = Card {
            title: Some("Stories".into()),
            created_at: Some(json!("2024-05-01T10:00:00Z")),
            share_count: Some(3),
            metadata: CardMetadata {
                languages: Some(vec!["en".into(), "de".into()]),
                media: Some(Media {
                    duration: Some(3661),
                    file_size: Some(1536),
                }),
                ..Default::default()
            },
            ..Default::default()
        };
        let text = render_card_metadata(&card);

        assert!(text.starts_with("Card Metadata\n=============\n"));
        assert!(text.contains("Title: Stories\n"));
        assert!(text.contains("Languages: en, de\n"));
        assert!(text.contains("Created At: 2024-05-01T10:00:00Z\n"));
        assert!(text.contains("Share Count: 3\n"));
        assert!(text.contains("Duration (seconds): 3661\nDuration: 1:01:01\n"));
        assert!(text.contains("File Size (bytes): 1536\nFile Size: 1.5 KB\n"));
    }

    #[test]
    fn test_field_order_is_fixed() {
        let text = render_card_metadata(&Card::default());
        let labels: Vec<&str> = text
            .lines()
            .filter_map(|l| l.split_once(": ").map(|(k, _)| k))
            .collect();
        assert_eq!(
            labels,
            [
                "Title", "Author", "Description", "Category", "Languages", "Playback Type",
                "Card ID", "Slug", "Created At", "Updated At", "Share Count", "Share Link URL",
                "Availability", "Content Version", "Cover Image", "Duration (seconds)",
                "Duration", "File Size (bytes)", "File Size", "Chapters", "Tracks",
            ]
        );
    }

    #[test]
    fn test_track_details() {
        let card = Card {
            title: Some("Mix".into()),
            ..Default::default()
        };
        let reports = vec![
            TrackReport {
                number: "1".into(),
                chapter: 0,
                track: Track {
                    title: Some("Intro".into()),
                    duration: Some(75),
                    file_size: Some(2048),
                    channels: Some(json!("stereo")),
                    ..Default::default()
                },
                icon_url: Some("https://cdn.example/i.png".into()),
                audio_file: Some("1 - Intro.mp3".into()),
                icon_file: Some("1.png".into()),
            },
            TrackReport {
                number: "2".into(),
                chapter: 1,
                track: Track::default(),
                icon_url: None,
                audio_file: None,
                icon_file: None,
            },
        ];
        let text = render_track_details(&card, &reports);

        assert!(text.starts_with("Track Details: Mix\n"));
        assert!(text.contains("Total Tracks: 2\n"));
        assert!(text.contains("[1] Intro\n  Chapter: 1\n"));
        assert!(text.contains("  Duration: 0:01:15\n"));
        assert!(text.contains("  File Size: 2.0 KB\n"));
        assert!(text.contains("  Channels: stereo\n"));
        assert!(text.contains("  Audio File: 1 - Intro.mp3\n"));
        assert!(text.contains("[2] __undefined__\n  Chapter: 2\n"));
        assert!(text.ends_with("  Icon File: __undefined__\n"));
    }
}
