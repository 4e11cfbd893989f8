use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_REDIRECTS: usize = 5;
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Settings applied to every remote fetch.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: format!("cardpull/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Everything one extraction run needs. Passed explicitly to each stage.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Card page or API URL, already normalized by [`normalize_url`].
    pub url: String,
    /// Destination folder; created if absent.
    pub output_dir: PathBuf,
    pub http: HttpConfig,
    /// Maximum number of tracks downloading at once.
    pub concurrency: usize,
    /// Also write `payload.json` and `source.md`.
    pub keep_payload: bool,
}

impl ExtractConfig {
    pub fn new(url: &str, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            url: normalize_url(url),
            output_dir: output_dir.into(),
            http: HttpConfig::default(),
            concurrency: DEFAULT_CONCURRENCY,
            keep_payload: false,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

/// Prefix `https://` unless the URL already names http or https.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("example.com/card/abc"), "https://example.com/card/abc");
        assert_eq!(normalize_url("http://example.com"), "http://example.com");
        assert_eq!(normalize_url("HTTPS://Example.com"), "HTTPS://Example.com");
        assert_eq!(normalize_url("  example.com  "), "https://example.com");
    }

    #[test]
    fn test_defaults() {
        let config = ExtractConfig::new("example.com", "out");
        assert_eq!(config.http.timeout, Duration::from_secs(120));
        assert_eq!(config.http.max_redirects, 5);
        assert_eq!(config.concurrency, 4);
        assert!(!config.keep_payload);
        assert_eq!(config.with_concurrency(0).concurrency, 1);
    }
}
