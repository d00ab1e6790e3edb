//! CLI entry point for crime_compare.
//!
//! Compares crime around a position with the city average and draws the
//! result as terminal bar charts, chart-ready JSON files, or CSV rows.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use crime_compare::config::Settings;
use crime_compare::infra::radar::RadarClient;
use crime_compare::interaction::{Collaborators, Flow, Interaction};
use crime_compare::location::{Coordinates, EnvLocation, FixedLocation, LocationProvider};
use crime_compare::notify::StderrNotifier;
use crime_compare::render::{ChartRenderer, CsvRenderer, JsonRenderer, TerminalRenderer};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "crime_compare")]
#[command(about = "Compare crime near a location with the city average", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Percentage difference per crime type against the city average
    CompareLocation(CompareArgs),
    /// Crimes per year near the location next to the city average, one chart per crime type
    CompareCityAverage(CompareArgs),
}

#[derive(Args)]
struct CompareArgs {
    /// Longitude; falls back to RADAR_LONGITUDE when omitted
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Latitude; falls back to RADAR_LATITUDE when omitted
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    /// How to draw the charts
    #[arg(short, long, value_enum, default_value_t = RendererKind::Terminal)]
    renderer: RendererKind,

    /// Output directory (json) or file (csv); ignored by the terminal renderer
    #[arg(short, long, default_value = "charts")]
    output: String,

    /// Statistics service root, overriding RADAR_BASE_URL
    #[arg(long)]
    base_url: Option<String>,

    /// Year to compare, overriding RADAR_YEAR
    #[arg(long)]
    year: Option<u16>,

    /// Geohash precision of the compared cell, overriding RADAR_PRECISION
    #[arg(long)]
    precision: Option<u8>,
}

#[derive(Clone, Copy, ValueEnum)]
enum RendererKind {
    Terminal,
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/crime_compare.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("crime_compare.log"));

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

    let cli = Cli::parse();

    let (flow, args) = match cli.command {
        Commands::CompareLocation(args) => (Flow::CompareLocation, args),
        Commands::CompareCityAverage(args) => (Flow::CompareToCityAverage, args),
    };

    let settings = settings_for(&args)?;
    debug!(?settings, "Settings loaded");

    let location: Arc<dyn LocationProvider> = match (args.lon, args.lat) {
        (Some(lon), Some(lat)) => Arc::new(FixedLocation(Coordinates::new(lon, lat)?)),
        _ => Arc::new(EnvLocation),
    };

    let deps = Collaborators {
        location,
        api: Arc::new(RadarClient::from_settings(&settings)?),
        notifier: Arc::new(StderrNotifier),
    };

    let renderer = renderer_for(args.renderer, &args.output)?;
    let done = Interaction::new(flow).run(&deps, renderer).await;

    info!(flow = ?done.flow, state = ?done.state(), "Interaction finished");
    done.result?;

    Ok(())
}

/// Environment settings with command line overrides applied.
fn settings_for(args: &CompareArgs) -> Result<Settings> {
    let mut settings = Settings::from_env()?;
    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.trim_end_matches('/').to_string();
    }
    if args.year.is_some() {
        settings.year = args.year;
    }
    if args.precision.is_some() {
        settings.precision = args.precision;
    }
    Ok(settings)
}

fn renderer_for(kind: RendererKind, output: &str) -> Result<Box<dyn ChartRenderer>> {
    let renderer: Box<dyn ChartRenderer> = match kind {
        RendererKind::Terminal => Box::new(TerminalRenderer::stdout()),
        RendererKind::Json => Box::new(JsonRenderer::new(output)?),
        RendererKind::Csv => Box::new(CsvRenderer::new(output)),
    };
    Ok(renderer)
}
