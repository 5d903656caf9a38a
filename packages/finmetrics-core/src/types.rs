//! Core data types for the metrics engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A ticker symbol, normalized to trimmed upper-case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// Create a ticker from any casing, e.g. `" aapl "` becomes `AAPL`.
    pub fn new(symbol: &str) -> Self {
        Self(symbol.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ticker {
    fn from(symbol: &str) -> Self {
        Self::new(symbol)
    }
}

/// Split a comma-separated ticker list, dropping blanks and repeats.
///
/// Order of first appearance is preserved.
///
/// ```rust
/// use finmetrics_core::types::parse_tickers;
///
/// let tickers = parse_tickers("aapl, MSFT,, googl, AAPL");
/// let names: Vec<&str> = tickers.iter().map(|t| t.as_str()).collect();
/// assert_eq!(names, vec!["AAPL", "MSFT", "GOOGL"]);
/// ```
pub fn parse_tickers(input: &str) -> Vec<Ticker> {
    let mut tickers: Vec<Ticker> = Vec::new();
    for raw in input.split(',') {
        if raw.trim().is_empty() {
            continue;
        }
        let ticker = Ticker::new(raw);
        if !tickers.contains(&ticker) {
            tickers.push(ticker);
        }
    }
    tickers
}

/// One observation of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    /// Closing price, assumed positive
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }
}

/// A time-ordered sequence of closing prices for one asset.
///
/// Dates are expected to be strictly increasing. Producing series that
/// respect this is the job of the market data provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    /// Build a series from `(date, close)` pairs.
    pub fn from_closes<I>(closes: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self::new(
            closes
                .into_iter()
                .map(|(date, close)| PricePoint::new(date, close))
                .collect(),
        )
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Closing prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }
}

/// A single periodic return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    /// Fractional return, e.g. 0.01 for 1%
    pub value: f64,
}

/// Periodic returns keyed by the date of the later observation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnSeries {
    points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    pub fn new(points: Vec<ReturnPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/// Risk/return summary for one asset or for a portfolio.
///
/// Fields that cannot be derived from the input are `None` rather than a
/// placeholder number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    /// Last closing price (absent for a multi-asset portfolio)
    pub current_price: Option<f64>,
    /// Total return over the window, in percent
    pub total_return_pct: Option<f64>,
    /// Annualized volatility in percent (needs at least 2 returns)
    pub annualized_volatility_pct: Option<f64>,
    /// Annualized Sharpe ratio, 0 when returns have zero variance
    pub sharpe_ratio: Option<f64>,
    /// Largest peak-to-trough decline in percent, always <= 0
    pub max_drawdown_pct: f64,
}

/// Historical Value-at-Risk for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarResult {
    pub ticker: Ticker,
    /// Confidence level, e.g. 0.95
    pub confidence: f64,
    /// Return percentile at `1 - confidence`, in percent (usually negative)
    pub var_pct: f64,
}

/// One point of the risk/return scatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReturnPoint {
    pub ticker: Ticker,
    pub total_return_pct: Option<f64>,
    pub annualized_volatility_pct: Option<f64>,
}

/// API response wrapper for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
