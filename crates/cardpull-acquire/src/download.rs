use crate::http::{fetch, HttpClient};
use crate::layout::OutputLayout;
use cardpull_model::ExtractError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Audio MIME types we know how to name.
const AUDIO_EXTENSIONS: &[(&str, &str)] = &[
    ("audio/mpeg", "mp3"),
    ("audio/aac", "aac"),
    ("audio/wav", "wav"),
    ("audio/ogg", "ogg"),
    ("audio/mp4", "m4a"),
    ("audio/x-m4a", "m4a"),
    ("audio/flac", "flac"),
];

/// A downloaded asset held in memory.
#[derive(Debug, Clone)]
pub struct Download {
    pub bytes: Vec<u8>,
    /// The `Content-Type` the server declared, if any.
    pub content_type: Option<String>,
}

/// Fetch a remote asset. Non-2xx statuses are fetch errors.
pub async fn download(client: &dyn HttpClient, url: &str) -> Result<Download, ExtractError> {
    let response = fetch(client, url).await?;
    Ok(Download {
        bytes: response.body,
        content_type: response.content_type,
    })
}

/// Map an audio content type to a file extension.
///
/// MIME parameters and case are ignored; anything outside the table is an error.
pub fn resolve_extension(content_type: &str) -> Result<&'static str, ExtractError> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    AUDIO_EXTENSIONS
        .iter()
        .find(|(known, _)| *known == mime)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| ExtractError::UnknownContentType(content_type.to_string()))
}

/// Download an image and write it to `path` as-is. Images are always named `.png`.
pub async fn save_image(
    client: &dyn HttpClient,
    url: &str,
    path: &Path,
) -> Result<PathBuf, ExtractError> {
    let asset = download(client, url).await?;
    fs::write(path, &asset.bytes).map_err(|e| ExtractError::filesystem(path, e))?;
    tracing::debug!(path = %path.display(), bytes = asset.bytes.len(), "Saved image");
    Ok(path.to_path_buf())
}

/// Download a track's audio into `tracks/`.
///
/// The bytes land in a temporary file first; it is renamed to
/// `<number> - <title>.<ext>` once the content type resolves, and removed otherwise.
pub async fn save_audio(
    client: &dyn HttpClient,
    layout: &OutputLayout,
    number: &str,
    title: &str,
    url: &str,
) -> Result<PathBuf, ExtractError> {
    let asset = download(client, url).await?;
    let dir = layout.tracks_dir();

    let mut temp = tempfile::Builder::new()
        .prefix(".download-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|e| ExtractError::filesystem(dir, e))?;
    let temp_path = temp.path().to_path_buf();
    temp.write_all(&asset.bytes)
        .map_err(|e| ExtractError::filesystem(&temp_path, e))?;

    let extension = resolve_extension(asset.content_type.as_deref().unwrap_or("<none>"))?;
    let path = layout.track_path(number, title, extension);
    temp.persist(&path)
        .map_err(|e| ExtractError::filesystem(&path, e.error))?;

    tracing::debug!(path = %path.display(), bytes = asset.bytes.len(), "Saved audio");
    Ok(path)
}
