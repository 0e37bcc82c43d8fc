//! CLI entry point for the customer map generator.
//!
//! Reads a customer CSV, geocodes every city, and writes a US choropleth of
//! customers per state with city markers as a standalone HTML page.

use anyhow::Result;
use clap::Parser;
use customer_map::config::{
    DEFAULT_INPUT, DEFAULT_OUTPUT, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, RunConfig,
};
use customer_map::fetch::BasicClient;
use customer_map::geocode::{CachedGeocoder, DEFAULT_SEARCH_URL, NominatimGeocoder};
use customer_map::output::{print_json, print_pretty};
use customer_map::pipeline;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "customer_map")]
#[command(about = "Render a customer choropleth map from a CSV list", long_about = None)]
struct Cli {
    /// Customer CSV with Organization Name, Customer Type, State, Org Specialty, City
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Where to write the HTML map
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// User-Agent sent to the geocoding service
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Per-request geocoding timeout in seconds; a timeout leaves the row unplotted
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Nominatim-compatible search endpoint
    #[arg(long, default_value = DEFAULT_SEARCH_URL)]
    geocoder_url: String,

    /// Look up every row, even repeated city/state pairs
    #[arg(long, default_value_t = false)]
    no_cache: bool,

    /// Do not open the map once it is written
    #[arg(long, default_value_t = false)]
    no_open: bool,

    /// Optional: also write the geocoded table to this CSV
    #[arg(long)]
    geocoded_csv: Option<PathBuf>,
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        RunConfig {
            input: cli.input,
            output: cli.output,
            user_agent: cli.user_agent,
            timeout: Duration::from_secs(cli.timeout_secs),
            geocoder_url: cli.geocoder_url,
            cache_lookups: !cli.no_cache,
            open_viewer: !cli.no_open,
            geocoded_csv: cli.geocoded_csv,
            ..RunConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/customer_map.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("customer_map.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let config: RunConfig = Cli::parse().into();

    let client = BasicClient::new(&config.user_agent, config.timeout)?;
    let nominatim = NominatimGeocoder::new(client, &config.geocoder_url)?;

    let summary = if config.cache_lookups {
        let geocoder = CachedGeocoder::new(nominatim);
        let summary = pipeline::run(&config, &geocoder).await?;
        summary.with_distinct_lookups(geocoder.len())
    } else {
        pipeline::run(&config, &nominatim).await?
    };

    print_pretty(&summary);
    print_json(&summary)?;
    info!(
        rows = summary.normalized_rows,
        states = summary.states,
        unresolved = summary.unresolved,
        resolved_pct = summary.resolved_pct(),
        "Customer map complete"
    );

    Ok(())
}
