use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use microclimate_analytics::config::{load_config, EngineConfig};
use microclimate_analytics::engine::split_results;
use microclimate_analytics::parsers::{parse_readings, resolve_input};
use microclimate_analytics::MicroclimateEngine;

#[derive(Parser, Debug)]
#[command(name = "microclimate")]
#[command(about = "Derive microclimate metrics from paired indoor/outdoor sensor readings", long_about = None)]
struct Args {
    /// Readings file (CSV with header row, JSON array or NDJSON)
    #[arg(long)]
    input: PathBuf,

    /// Input format (csv or json); inferred from the extension when omitted
    #[arg(long)]
    format: Option<String>,

    /// CSV field delimiter
    #[arg(long)]
    delimiter: Option<char>,

    /// Engine configuration file (JSON)
    #[arg(long, env = "MICROCLIMATE_CONFIG")]
    config: Option<PathBuf>,

    /// Reject non-finite and out-of-range readings
    #[arg(long)]
    strict: bool,

    /// Write a pretty-printed JSON array instead of one record per line
    #[arg(long)]
    pretty: bool,

    /// Output file (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("microclimate_analytics=info".parse()?),
        )
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?.with_env_overrides()?,
        None => EngineConfig::from_env()?,
    }
    .with_strict_override(args.strict);
    let engine = MicroclimateEngine::new(config);
    info!(
        "Engine config: validation={:?}, thermal_stability={}",
        engine.config().validation,
        engine.config().thermal_stability
    );

    let (format, delimiter) = resolve_input(&args.input, args.format.as_deref(), args.delimiter)?;

    let start = Instant::now();
    let readings = parse_readings(&args.input, format, delimiter)
        .with_context(|| format!("Failed to read readings from {}", args.input.display()))?;
    info!("Loaded {} readings from {}", readings.len(), args.input.display());

    let (metrics, rejected) = split_results(engine.try_compute_batch(&readings));
    for (position, e) in &rejected {
        warn!("Skipping reading {}: {}", position, e);
    }

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);

    if args.pretty {
        serde_json::to_writer_pretty(&mut writer, &metrics)?;
        writeln!(writer)?;
    } else {
        for m in &metrics {
            serde_json::to_writer(&mut writer, m)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;

    let condensation = metrics.iter().filter(|m| m.hygrometric.condensation_risk).count();
    info!(
        "Processed {} readings ({} rejected, {} with condensation risk) in {:.2?}",
        metrics.len(),
        rejected.len(),
        condensation,
        start.elapsed()
    );

    Ok(())
}
