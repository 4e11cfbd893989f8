use cardpull_model::ExtractError;
use cardpull_render::sanitize_filename;
use std::fs;
use std::path::{Path, PathBuf};

/// The output directory tree of one run.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
    tracks: PathBuf,
    icons: PathBuf,
}

/// Create `root/`, `root/tracks/` and `root/icons/`. Existing directories are left alone.
pub fn prepare(root: &Path) -> Result<OutputLayout, ExtractError> {
    let layout = OutputLayout {
        root: root.to_path_buf(),
        tracks: root.join("tracks"),
        icons: root.join("icons"),
    };
    for dir in [&layout.root, &layout.tracks, &layout.icons] {
        fs::create_dir_all(dir).map_err(|e| ExtractError::filesystem(dir, e))?;
    }
    tracing::debug!(root = %root.display(), "Prepared output directories");
    Ok(layout)
}

/// Remove everything an earlier run wrote so this run starts fresh.
///
/// Empties `tracks/` and `icons/` and deletes the generated root files.
/// Reports are rewritten later; anything else in the root is left alone.
pub fn reset(layout: &OutputLayout) -> Result<(), ExtractError> {
    let mut removed = 0;
    for dir in [&layout.tracks, &layout.icons] {
        let entries = fs::read_dir(dir).map_err(|e| ExtractError::filesystem(dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| ExtractError::filesystem(dir, e))?.path();
            let result = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            result.map_err(|e| ExtractError::filesystem(&path, e))?;
            removed += 1;
        }
    }
    for path in [layout.artwork_path(), layout.payload_path(), layout.source_path()] {
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(ExtractError::filesystem(&path, e)),
        }
    }
    if removed > 0 {
        tracing::info!(root = %layout.root.display(), removed, "Cleared previous output");
    }
    Ok(())
}

impl OutputLayout {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tracks_dir(&self) -> &Path {
        &self.tracks
    }

    pub fn icons_dir(&self) -> &Path {
        &self.icons
    }

    pub fn artwork_path(&self) -> PathBuf {
        self.root.join("artwork.png")
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join("metadata.txt")
    }

    pub fn track_details_path(&self) -> PathBuf {
        self.root.join("track-details.txt")
    }

    pub fn payload_path(&self) -> PathBuf {
        self.root.join("payload.json")
    }

    pub fn source_path(&self) -> PathBuf {
        self.root.join("source.md")
    }

    /// `tracks/<NNN> - <sanitized title>.<ext>`
    pub fn track_path(&self, number: &str, title: &str, extension: &str) -> PathBuf {
        self.tracks
            .join(format!("{number} - {}.{extension}", sanitize_filename(title)))
    }

    /// `icons/<NNN>.png`
    pub fn icon_path(&self, number: &str) -> PathBuf {
        self.icons.join(format!("{number}.png"))
    }
}
