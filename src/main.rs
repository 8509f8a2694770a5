mod engine;
mod models;
mod policy;
mod rates;
mod storage;
mod types;

use std::io::{stderr, stdout, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::engine::FeeEngine;
use crate::models::{FeeSchedule, DEFAULT_BASE_CURRENCY};
use crate::rates::{
    FileRateSource, HttpRateSource, RateSnapshot, RateSource, DEFAULT_MAX_ATTEMPTS, DEFAULT_RATES_URL, DEFAULT_RETRY_DELAY,
    DEFAULT_TIMEOUT
};
use crate::storage::{StatsStorage, WeeklyStatsTracker};

/// Calculate commission fees for the transactions in a CSV file.
///
/// Each input row is `date,user id,user type,operation type,amount,currency`
/// and produces one fee line on stdout, in input order.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Path to the input CSV file
    csv_file: PathBuf,

    /// Exchange rate service endpoint
    #[arg(long, env = "FEE_RATES_URL", default_value = DEFAULT_RATES_URL)]
    rates_url: String,

    /// Access key for the exchange rate service
    #[arg(long, env = "FEE_RATES_ACCESS_KEY", hide_env_values = true)]
    access_key: Option<String>,

    /// Read exchange rates from a JSON file instead of the service
    #[arg(long)]
    rates_file: Option<PathBuf>,

    /// Currency all amounts are normalized to
    #[arg(long, default_value = DEFAULT_BASE_CURRENCY)]
    base_currency: String,

    /// Exchange rate request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Attempts made to fetch exchange rates before giving up
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    /// Base delay in milliseconds between exchange rate attempts, multiplied by the attempt number
    #[arg(long, default_value_t = DEFAULT_RETRY_DELAY.as_millis() as u64)]
    retry_delay_ms: u64,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, default_value = "error", value_parser = parse_log_level)]
    log_level: LevelFilter
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let log_level = cli.log_level;

    setup_logging(log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            //NOTE: Fatal errors must reach the user even when logging is switched off
            if log_level == LevelFilter::OFF {
                eprintln!("{error:#}");
            } else {
                error!("{error:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let snapshot = load_rates(&cli).await.context("Failed to fetch exchange rates")?;
    if snapshot.is_empty() {
        warn!("Exchange rate snapshot is empty, only {} amounts can be processed", cli.base_currency);
    } else {
        info!("Loaded {} exchange rates against {}", snapshot.len(), cli.base_currency);
    }

    let schedule = FeeSchedule::with_base_currency(cli.base_currency);
    let mut engine = FeeEngine::new(schedule, snapshot, WeeklyStatsTracker::new());

    //NOTE: Fees are buffered so that a failing batch prints nothing at all
    let mut fees = Vec::new();
    let timer = Instant::now();
    let processed = engine.run_file(&cli.csv_file, &mut fees)
        .with_context(|| format!("Failed to calculate fees for {}", cli.csv_file.display()))?;

    info!("Calculated {processed} fees across {} weekly aggregates in: {:?}", engine.stats().len(), timer.elapsed());

    let mut output = stdout().lock();
    output.write_all(&fees)?;
    output.flush()?;

    Ok(())
}

async fn load_rates(cli: &Cli) -> Result<RateSnapshot> {
    if let Some(path) = &cli.rates_file {
        return Ok(FileRateSource::new(path).fetch().await?);
    }

    let mut builder = HttpRateSource::builder()
        .url(&cli.rates_url)
        .access_key(cli.access_key.clone())
        .timeout(Duration::from_secs(cli.timeout_secs))
        .max_attempts(cli.max_attempts)
        .retry_delay(Duration::from_millis(cli.retry_delay_ms));

    if cli.base_currency != DEFAULT_BASE_CURRENCY {
        builder = builder.base_currency(&cli.base_currency);
    }

    let source = builder.build()?;

    info!("Fetching exchange rates from {}", source.url());

    Ok(source.fetch().await?)
}

fn parse_log_level(level: &str) -> Result<LevelFilter, String> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" => Ok(LevelFilter::WARN),
        "error" => Ok(LevelFilter::ERROR),
        "off" => Ok(LevelFilter::OFF),
        _ => Err(format!("invalid log level '{level}'"))
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: Fees go to stdout, so logging has to use stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_ansi(stderr().is_terminal())
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
