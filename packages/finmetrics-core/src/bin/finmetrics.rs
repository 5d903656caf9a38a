//! finmetrics CLI - risk/return metrics for price files.
//!
//! Every command prints one JSON document wrapped in `ApiResponse` on stdout.
//! Logs go to stderr and are controlled with `RUST_LOG`.

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use finmetrics_core::{
    compute_returns, normalized_prices, parse_tickers, return_histogram, summarize_with,
    Analyzer, ApiResponse, CachedProvider, Config, DateRange, JsonFileProvider,
    MarketDataProvider, Period, Ticker,
};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "finmetrics")]
#[command(about = "Risk/return metrics and equal-weight portfolio analysis")]
#[command(version)]
struct Cli {
    /// Directory of <TICKER>.json price files (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze tickers individually and as an equal-weight portfolio
    Analyze {
        /// Tickers (comma-separated)
        #[arg(short, long)]
        tickers: String,
        #[command(flatten)]
        window: Window,
        /// Confidence level for VaR (0.95 = 95%)
        #[arg(long)]
        confidence: Option<f64>,
        /// Include cumulative return curves
        #[arg(long)]
        curves: bool,
    },
    /// Normalized prices and return distribution for one ticker
    Series {
        /// Stock symbol
        #[arg(short, long)]
        ticker: String,
        #[command(flatten)]
        window: Window,
        /// Number of histogram bins
        #[arg(long, default_value = "50")]
        bins: usize,
    },
    /// Summarize a single price file
    Summary {
        /// Path to a JSON price file
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Show the effective configuration
    Config,
}

#[derive(clap::Args)]
struct Window {
    /// Look-back period: 1M, 3M, 6M, 1Y, 2Y, 5Y
    #[arg(short, long)]
    period: Option<Period>,
    /// Last date of the window (defaults to today)
    #[arg(long)]
    end: Option<NaiveDate>,
    /// First date of the window (overrides --period)
    #[arg(long)]
    start: Option<NaiveDate>,
}

impl Window {
    fn range(&self, config: &Config) -> finmetrics_core::Result<DateRange> {
        let end = self.end.unwrap_or_else(|| Local::now().date_naive());
        match self.start {
            Some(start) => DateRange::new(start, end),
            None => Ok(DateRange::trailing(
                self.period.unwrap_or(config.default_period),
                end,
            )),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            println!("{}", render(&ApiResponse::<()>::err(format!("{:#}", e))));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let mut config = Config::load().context("loading configuration")?;
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }

    match cli.command {
        Commands::Analyze {
            tickers,
            window,
            confidence,
            curves,
        } => handle_analyze(&config, &tickers, &window, confidence, curves),
        Commands::Series {
            ticker,
            window,
            bins,
        } => handle_series(&config, &ticker, &window, bins),
        Commands::Summary { file } => handle_summary(&config, file),
        Commands::Config => Ok(render(&ApiResponse::ok(&config))),
    }
}

fn provider(config: &Config) -> CachedProvider<JsonFileProvider> {
    CachedProvider::new(JsonFileProvider::new(&config.data_dir), config.cache_ttl())
}

fn handle_analyze(
    config: &Config,
    tickers: &str,
    window: &Window,
    confidence: Option<f64>,
    curves: bool,
) -> anyhow::Result<String> {
    let tickers = parse_tickers(tickers);
    if tickers.is_empty() {
        anyhow::bail!("Please enter at least one ticker");
    }
    let confidence = confidence.unwrap_or(config.var_confidence);
    if !(confidence > 0.0 && confidence < 1.0) {
        anyhow::bail!("confidence must be between 0 and 1, got {}", confidence);
    }

    let range = window.range(config)?;
    let analyzer = Analyzer::from_config(provider(config), config)
        .with_var_confidence(confidence)
        .with_curves(curves);
    let report = analyzer.run(&tickers, range);

    if report.assets.is_empty() {
        anyhow::bail!("No valid price data for any requested ticker");
    }
    Ok(render(&ApiResponse::ok(report)))
}

fn handle_series(
    config: &Config,
    ticker: &str,
    window: &Window,
    bins: usize,
) -> anyhow::Result<String> {
    let ticker = Ticker::new(ticker);
    let range = window.range(config)?;
    let series = provider(config).fetch(&ticker, &range)?;
    if series.is_empty() {
        anyhow::bail!("No prices for {} in {}", ticker, range);
    }

    let returns = compute_returns(&series);
    Ok(render(&ApiResponse::ok(json!({
        "ticker": ticker,
        "range": range,
        "normalized": normalized_prices(&series),
        "volume": series.points().iter().map(|p| (p.date, p.volume)).collect::<Vec<_>>(),
        "return_histogram_pct": return_histogram(&returns, bins),
    }))))
}

fn handle_summary(config: &Config, file: PathBuf) -> anyhow::Result<String> {
    let series = JsonFileProvider::load_file(&file)
        .with_context(|| format!("reading {}", file.display()))?;
    let summary = summarize_with(&series, &config.engine_params())
        .with_context(|| format!("{} holds no prices", file.display()))?;
    Ok(render(&ApiResponse::ok(json!({
        "file": file,
        "observations": series.len(),
        "summary": summary,
    }))))
}

fn render<T: Serialize>(response: &ApiResponse<T>) -> String {
    serde_json::to_string_pretty(response)
        .unwrap_or_else(|e| format!(r#"{{"ok":false,"error":"serialization failed: {}"}}"#, e))
}
