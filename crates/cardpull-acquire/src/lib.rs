pub mod config;
pub mod download;
pub mod extract;
pub mod http;
pub mod layout;
pub mod locate;
pub mod output;
pub mod pipeline;

pub use config::{normalize_url, ExtractConfig, HttpConfig};
pub use download::{download, resolve_extension, save_audio, save_image, Download};
pub use extract::{extract, ExtractSummary};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use layout::{prepare, reset, OutputLayout};
pub use locate::{extract_payload, locate};
pub use pipeline::{plan_tracks, run_tracks, AssetStatus, PipelineResult, PlannedTrack};
