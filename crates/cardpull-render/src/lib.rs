pub mod format;
pub mod report;

pub use format::{convert_bytes, convert_seconds, pad_number, sanitize_filename};
pub use report::{render_card_metadata, render_track_details, TrackReport, UNDEFINED};
