//! Historical Value-at-Risk.

use crate::returns::compute_returns;
use crate::stats::percentile;
use crate::types::{PriceSeries, Ticker, VarResult};

/// Confidence level used when none is configured.
pub const DEFAULT_VAR_CONFIDENCE: f64 = 0.95;

/// Historical VaR of a price series.
///
/// The result is the `1 - confidence` percentile of the periodic return
/// distribution, in percent. It is usually negative: at 95% confidence a
/// value of `-2.1` reads as "a 5% chance of losing more than 2.1% in one
/// period". Returns `None` when the series yields no returns.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use finmetrics_core::risk::value_at_risk;
/// use finmetrics_core::types::{PriceSeries, Ticker};
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
/// let prices = PriceSeries::from_closes(vec![(d(2), 100.0), (d(3), 98.0)]);
/// let var = value_at_risk(&Ticker::new("AAPL"), &prices, 0.95).unwrap();
///
/// assert!((var.var_pct + 2.0).abs() < 1e-9);
/// ```
pub fn value_at_risk(ticker: &Ticker, series: &PriceSeries, confidence: f64) -> Option<VarResult> {
    let returns = compute_returns(series).values();
    let var_pct = historical_var_pct(&returns, confidence)?;
    Some(VarResult {
        ticker: ticker.clone(),
        confidence,
        var_pct,
    })
}

/// Historical VaR in percent from fractional periodic returns.
pub fn historical_var_pct(returns: &[f64], confidence: f64) -> Option<f64> {
    percentile(returns, (1.0 - confidence) * 100.0).map(|q| q * 100.0)
}
