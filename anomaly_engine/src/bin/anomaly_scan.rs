use std::{io, path::PathBuf};

use anomaly_engine::{
    AnomalyEngine, AnomalyRecord, AnomalySummary, EngineConfig, load_config_path, methodology,
    summarize,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use market_data::{
    BarSeries,
    io::{JsonFile, JsonReader, SeriesSource},
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Scan daily price series for anomalies")]
struct Cli {
    /// Engine config TOML; defaults are used when absent
    #[arg(long, global = true, value_name = "FILE", env = "ANOMALY_ENGINE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Detect anomalies in a series document
    Detect {
        /// Series JSON; read from stdin when omitted
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Compute dashboard metrics for a series document
    Metrics {
        /// Series JSON; read from stdin when omitted
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Print the detection methodology
    Methodology,
    /// Print the effective engine configuration as TOML
    Config,
}

#[derive(Serialize)]
struct DetectOutput<'a> {
    symbol: &'a str,
    anomalies: Vec<AnomalyRecord>,
    summary: AnomalySummary,
}

fn init_logging() {
    // stdout carries JSON, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_series(input: Option<PathBuf>) -> Result<BarSeries> {
    let series = match input {
        Some(path) => JsonFile::new(&path)
            .load()
            .with_context(|| format!("load series from {}", path.display()))?,
        None => JsonReader::new(io::stdin().lock())
            .load()
            .context("load series from stdin")?,
    };
    Ok(series)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    serde_json::to_writer_pretty(io::stdout().lock(), value)?;
    println!();
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_path(path)?,
        None => EngineConfig::default(),
    };
    let engine = AnomalyEngine::new(config)?;

    match cli.cmd {
        Cmd::Detect { input } => {
            let series = load_series(input)?;
            let anomalies = engine.detect(&series);
            info!(symbol = series.symbol(), count = anomalies.len(), "scan finished");
            let summary = summarize(&anomalies);
            print_json(&DetectOutput {
                symbol: series.symbol(),
                anomalies,
                summary,
            })?;
        }
        Cmd::Metrics { input } => {
            let series = load_series(input)?;
            print_json(&engine.metrics(&series))?;
        }
        Cmd::Methodology => print_json(&methodology())?,
        Cmd::Config => print!("{}", toml::to_string_pretty(engine.config())?),
    }

    Ok(())
}
