use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between fetching a card page and writing its files.
///
/// `Fetch`, `Parse` and `Schema` are fatal when they happen during payload location
/// or normalization. During a single asset download, `Fetch`, `UnknownContentType`
/// and `Filesystem` only cost that asset.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("no JSON payload found: {0}")]
    Parse(String),

    #[error("no recognized card shape: {0}")]
    Schema(String),

    #[error("unknown audio content type: {0}")]
    UnknownContentType(String),

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}
