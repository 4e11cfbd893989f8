use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Name used when sanitizing leaves nothing behind.
pub const UNTITLED: &str = "untitled";

static ILLEGAL_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\t<>:"/\\|?*]"#).expect("valid regex"));

const BYTE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Make a title safe to use as a file name.
///
/// NFC-normalizes, strips tabs and `<>:"/\|?*`, then trims whitespace.
/// Returns `"untitled"` when nothing is left.
pub fn sanitize_filename(name: &str) -> String {
    let nfc: String = name.nfc().collect();
    let stripped = ILLEGAL_FILENAME_CHARS.replace_all(&nfc, "");
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        UNTITLED.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Human-readable size in base-1024 units, one decimal place (`1536` → `"1.5 KB"`).
pub fn convert_bytes(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size.abs() >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", BYTE_UNITS[unit])
}

/// `H:MM:SS` with unbounded hours (`3661` → `"1:01:01"`).
pub fn convert_seconds(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}

/// Zero-pad a 1-based sequence number to the width of `total`.
pub fn pad_number(sequence: usize, total: usize) -> String {
    let width = total.to_string().len();
    format!("{sequence:0width$}")
}
