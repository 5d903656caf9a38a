//! Financial metrics engine.
//!
//! Turns daily price series into risk/return statistics and combines several
//! assets into an equal-weight portfolio view:
//!
//! - **Returns**: periodic returns, normalized prices, wealth index, histogram
//! - **Metrics**: total return, annualized volatility, Sharpe ratio, max drawdown
//! - **Portfolio**: inner-join alignment and equal-weight aggregation
//! - **Risk**: historical Value-at-Risk, correlation matrix
//! - **Analysis**: fetch-then-compute orchestration over a market data provider
//!
//! The computation modules are pure functions. Undefined results are
//! reported as `None`, never as errors; `Error` covers I/O, parsing and
//! configuration only.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use finmetrics_core::{summarize, PriceSeries};
//!
//! let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
//! let prices = PriceSeries::from_closes(vec![
//!     (d(2), 100.0),
//!     (d(3), 102.0),
//!     (d(4), 99.0),
//!     (d(5), 104.0),
//! ]);
//!
//! let summary = summarize(&prices).expect("series is not empty");
//! println!("Total return: {:.2}%", summary.total_return_pct.unwrap_or_default());
//! assert!(summary.max_drawdown_pct <= 0.0);
//! ```

pub mod analysis;
pub mod config;
pub mod metrics;
pub mod portfolio;
pub mod provider;
pub mod returns;
pub mod risk;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use types::{
    parse_tickers, ApiResponse, MetricsSummary, PricePoint, PriceSeries, ReturnPoint,
    ReturnSeries, RiskReturnPoint, Ticker, VarResult,
};

// Re-export main functionality
pub use analysis::{AnalysisReport, Analyzer, AssetReport};
pub use config::Config;
pub use metrics::{summarize, summarize_returns, summarize_with, EngineParams};
pub use portfolio::{aggregate, aggregate_with, align_returns, PortfolioAnalysis};
pub use provider::{
    CachedProvider, DateRange, InMemoryProvider, JsonFileProvider, MarketDataProvider, Period,
};
pub use returns::{compute_returns, cumulative_returns, normalized_prices, return_histogram};
pub use risk::{correlation_matrix, value_at_risk, CorrelationMatrix};

/// Error types for finmetrics-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("No price data: {0}")]
    NoData(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),
}

/// Result type for finmetrics-core operations.
pub type Result<T> = std::result::Result<T, Error>;
