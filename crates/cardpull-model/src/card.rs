use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Author shown when a card carries none (user-made cards).
pub const DEFAULT_AUTHOR: &str = "MYO";

/// A card: one playable item with its metadata and ordered chapters.
///
/// Mirrors the JSON served by the card pages. Every field is optional because
/// the renderers substitute a placeholder for anything missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default)]
    pub card_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    /// Opaque timestamp, passed through verbatim.
    #[serde(default)]
    pub created_at: Option<Value>,
    /// Opaque timestamp, passed through verbatim.
    #[serde(default)]
    pub updated_at: Option<Value>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub share_count: Option<u64>,
    #[serde(default)]
    pub share_link_url: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub metadata: CardMetadata,
    #[serde(default)]
    pub content: CardContent,
}

/// The `metadata` block of a card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMetadata {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub languages: Option<Vec<String>>,
    #[serde(default)]
    pub playback_type: Option<String>,
    #[serde(default)]
    pub cover: Option<Cover>,
    #[serde(default)]
    pub media: Option<Media>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cover {
    #[serde(default, rename = "imageL")]
    pub image_l: Option<String>,
}

/// Aggregate media figures for the whole card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// Seconds.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub duration: Option<u64>,
    /// Bytes.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub file_size: Option<u64>,
}

/// The `content` block: playback settings and the chapter list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardContent {
    #[serde(default)]
    pub version: Option<Value>,
    #[serde(default)]
    pub playback_type: Option<String>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

/// An ordered group of tracks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tracks: Vec<Track>,
    /// Fallback icon for tracks that carry none of their own.
    #[serde(default)]
    pub display: Option<DisplayIcons>,
}

/// A single playable audio unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub track_url: Option<String>,
    #[serde(default)]
    pub display: Option<DisplayIcons>,
    /// Seconds.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub duration: Option<u64>,
    /// Bytes.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub channels: Option<Value>,
    #[serde(default)]
    pub format: Option<String>,
}

/// The `display` block of a chapter or track; only the small icon is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayIcons {
    #[serde(default, rename = "icon16x16")]
    pub icon_16x16: Option<String>,
}

impl Card {
    /// The author, falling back to [`DEFAULT_AUTHOR`].
    pub fn author(&self) -> &str {
        self.metadata
            .author
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or(DEFAULT_AUTHOR)
    }

    /// Playback type from `content`, else from `metadata`.
    pub fn playback_type(&self) -> Option<&str> {
        self.content
            .playback_type
            .as_deref()
            .or(self.metadata.playback_type.as_deref())
    }

    pub fn cover_url(&self) -> Option<&str> {
        self.metadata
            .cover
            .as_ref()
            .and_then(|c| c.image_l.as_deref())
            .filter(|u| !u.is_empty())
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.content.chapters
    }

    /// Total number of tracks across all chapters.
    pub fn track_count(&self) -> usize {
        self.content.chapters.iter().map(|c| c.tracks.len()).sum()
    }
}

impl Chapter {
    pub fn icon_url(&self) -> Option<&str> {
        self.display
            .as_ref()
            .and_then(|d| d.icon_16x16.as_deref())
            .filter(|u| !u.is_empty())
    }
}

impl Track {
    pub fn icon_url(&self) -> Option<&str> {
        self.display
            .as_ref()
            .and_then(|d| d.icon_16x16.as_deref())
            .filter(|u| !u.is_empty())
    }

    pub fn audio_url(&self) -> Option<&str> {
        self.track_url.as_deref().filter(|u| !u.is_empty())
    }
}

/// Accept integer or fractional JSON numbers; fractions truncate toward zero.
/// Negative numbers and non-numeric values read as absent.
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_to_u64))
}

fn number_to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_card() {
        let card: Card = serde_json::from_value(json!({
            "cardId": "abc12",
            "title": "Bedtime Stories",
            "createdAt": "2024-01-02T03:04:05.000Z",
            "shareCount": 7,
            "metadata": {
                "author": "Jane",
                "languages": ["en", "fr"],
                "cover": { "imageL": "https://cdn.example/cover.png" },
                "media": { "duration": 3661, "fileSize": 1536 }
            },
            "content": {
                "version": "3",
                "playbackType": "linear",
                "chapters": [
                    { "tracks": [ { "title": "One", "type": "audio", "duration": 12.9 } ] }
                ]
            }
        }))
        .unwrap();

        assert_eq!(card.card_id.as_deref(), Some("abc12"));
        assert_eq!(card.author(), "Jane");
        assert_eq!(card.playback_type(), Some("linear"));
        assert_eq!(card.cover_url(), Some("https://cdn.example/cover.png"));
        assert_eq!(card.metadata.media.as_ref().unwrap().duration, Some(3661));
        assert_eq!(card.track_count(), 1);
        assert_eq!(card.content.chapters[0].tracks[0].kind.as_deref(), Some("audio"));
        assert_eq!(card.content.chapters[0].tracks[0].duration, Some(12));
    }

    #[test]
    fn test_default_author() {
        let card = Card::default();
        assert_eq!(card.author(), "MYO");
    }

    #[test]
    fn test_lenient_numbers() {
        let track: Track = serde_json::from_value(json!({
            "duration": "long",
            "fileSize": -4,
        }))
        .unwrap();
        assert_eq!(track.duration, None);
        assert_eq!(track.file_size, None);

        let track: Track = serde_json::from_value(json!({ "duration": null })).unwrap();
        assert_eq!(track.duration, None);
    }

    #[test]
    fn test_empty_icon_urls_are_absent() {
        let chapter: Chapter = serde_json::from_value(json!({
            "display": { "icon16x16": "" },
            "tracks": [ { "display": { "icon16x16": "https://cdn.example/i.png" } } ]
        }))
        .unwrap();
        assert_eq!(chapter.icon_url(), None);
        assert_eq!(chapter.tracks[0].icon_url(), Some("https://cdn.example/i.png"));
    }
}
