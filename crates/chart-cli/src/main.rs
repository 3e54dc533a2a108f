//! chart-cli: build a stock chart from local data files and print it as JSON.
//!
//! Reads `<CHART_DATA_DIR>/<TICKER>.bars.json` and, when financials are included,
//! `<TICKER>.fundamentals.json`.
//!
//! Usage:
//!   chart-cli --ticker AAPL
//!   chart-cli --ticker AAPL --request request.json --pretty
//!   chart-cli --ticker AAPL --as-of 2024-06-28

mod config;
mod store;

use anyhow::{bail, Context, Result};
use chart_composer::{build_chart, ChartOptions, ChartRequest};
use chrono::{DateTime, NaiveDate, Utc};
use config::CliConfig;
use store::FileStore;

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Logs go to stderr so stdout stays pure JSON
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

/// End of the chart window: midnight after the `--as-of` date, or now.
fn as_of(args: &[String]) -> Result<DateTime<Utc>> {
    match arg_value(args, "--as-of") {
        Some(date) => {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("--as-of must be YYYY-MM-DD, got {}", date))?;
            let next_day = date.succ_opt().context("--as-of date out of range")?;
            Ok(next_day.and_hms_opt(0, 0, 0).context("invalid --as-of time")?.and_utc())
        }
        None => Ok(Utc::now()),
    }
}

fn load_options(args: &[String], config: &CliConfig) -> Result<ChartOptions> {
    match arg_value(args, "--request") {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read request file {}", path))?;
            serde_json::from_str(&text).with_context(|| format!("Invalid chart request in {}", path))
        }
        None => Ok(ChartOptions {
            period: config.default_period,
            ..Default::default()
        }),
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let pretty = args.iter().any(|a| a == "--pretty");
    let Some(ticker) = arg_value(&args, "--ticker") else {
        bail!("Usage: chart-cli --ticker <SYMBOL> [--request <file.json>] [--as-of <YYYY-MM-DD>] [--pretty]");
    };

    let config = CliConfig::from_env()?;
    let request = ChartRequest {
        ticker: ticker.to_ascii_uppercase(),
        options: load_options(&args, &config)?,
    };
    let now = as_of(&args)?;

    tracing::info!("Reading chart data for {} from {}", request.ticker, config.data_dir.display());
    let store = FileStore::new(&config.data_dir);

    let result = build_chart(&store, &store, &request, now)
        .with_context(|| format!("Failed to build chart for {}", request.ticker))?;

    println!("{}", result.to_json(pretty)?);
    Ok(())
}
