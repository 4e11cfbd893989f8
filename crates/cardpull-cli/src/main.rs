use anyhow::Result;
use cardpull_acquire::{ExtractConfig, HttpClient, ReqwestClient};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "cardpull")]
#[command(about = "Extract a card's metadata, artwork, icons and audio into a local folder")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Card page or API URL (https:// is assumed when no scheme is given)
    url: String,

    /// Destination folder name
    folder: PathBuf,

    /// Maximum number of tracks downloading at once
    #[arg(short, long, env = "CARDPULL_CONCURRENCY", default_value_t = cardpull_acquire::config::DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, env = "CARDPULL_TIMEOUT", default_value_t = cardpull_acquire::config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Maximum redirects followed per request
    #[arg(long, env = "CARDPULL_MAX_REDIRECTS", default_value_t = cardpull_acquire::config::DEFAULT_MAX_REDIRECTS)]
    max_redirects: usize,

    /// Also write the raw payload (payload.json) and a provenance note (source.md)
    #[arg(long)]
    keep_payload: bool,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long)]
    utc: bool,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Verbose levels are for cardpull itself, not the scraper and HTTP stack
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn,hyper_util=warn,reqwest=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn,hyper_util=warn,reqwest=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // e.g. 2026-10-19 08:15:02.417 +02:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    let mut config = ExtractConfig::new(&cli.url, cli.folder).with_concurrency(cli.concurrency);
    config.http.timeout = Duration::from_secs(cli.timeout);
    config.http.max_redirects = cli.max_redirects;
    config.keep_payload = cli.keep_payload;

    tracing::info!(
        url = %config.url,
        folder = %config.output_dir.display(),
        concurrency = config.concurrency,
        "Extracting card"
    );

    let client: Arc<dyn HttpClient> = Arc::new(ReqwestClient::new(&config.http)?);
    let summary = cardpull_acquire::extract(client, &config).await?;

    if summary.audio_failed > 0 || summary.icons_failed > 0 {
        tracing::warn!(
            audio_failed = summary.audio_failed,
            icons_failed = summary.icons_failed,
            "Some assets could not be downloaded"
        );
    }

    Ok(())
}
