//! Periodic returns and the series derived from them.

use crate::types::{PriceSeries, ReturnPoint, ReturnSeries};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Compute simple periodic returns from a price series.
///
/// Each return is `(p[t] - p[t-1]) / p[t-1]` and carries the date of `p[t]`,
/// so the output is one shorter than the input. Series with fewer than two
/// prices yield an empty result.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use finmetrics_core::returns::compute_returns;
/// use finmetrics_core::types::PriceSeries;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
/// let prices = PriceSeries::from_closes(vec![(d(2), 100.0), (d(3), 110.0), (d(4), 99.0)]);
/// let returns = compute_returns(&prices);
///
/// assert_eq!(returns.len(), 2);
/// assert!((returns.values()[0] - 0.10).abs() < 1e-12);
/// assert!((returns.values()[1] + 0.10).abs() < 1e-12);
/// ```
pub fn compute_returns(series: &PriceSeries) -> ReturnSeries {
    ReturnSeries::new(
        series
            .points()
            .windows(2)
            .map(|w| ReturnPoint {
                date: w[1].date,
                value: (w[1].close - w[0].close) / w[0].close,
            })
            .collect(),
    )
}

/// Rebase a price series to 100 at its first observation.
pub fn normalized_prices(series: &PriceSeries) -> Vec<(NaiveDate, f64)> {
    let Some(base) = series.first().map(|p| p.close) else {
        return Vec::new();
    };
    series
        .points()
        .iter()
        .map(|p| (p.date, p.close / base * 100.0))
        .collect()
}

/// Wealth index `W[t] = prod(1 + r[0..=t])` for a return series.
pub fn cumulative_returns(returns: &ReturnSeries) -> Vec<(NaiveDate, f64)> {
    let mut wealth = 1.0;
    returns
        .points()
        .iter()
        .map(|p| {
            wealth *= 1.0 + p.value;
            (p.date, wealth)
        })
        .collect()
}

/// Equal-width histogram of returns expressed in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges in percent; `edges.len() == counts.len() + 1`
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Bucket daily returns (in percent) into `bins` equal-width bins.
///
/// The last bin is closed on the right so the maximum lands in it. Returns
/// `None` for an empty series or `bins == 0`.
pub fn return_histogram(returns: &ReturnSeries, bins: usize) -> Option<Histogram> {
    if returns.is_empty() || bins == 0 {
        return None;
    }
    let pct: Vec<f64> = returns.points().iter().map(|p| p.value * 100.0).collect();
    let min = pct.iter().copied().fold(f64::INFINITY, f64::min);
    let max = pct.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // A flat distribution still gets a usable unit-wide range
    let (lo, hi) = if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    };
    let width = (hi - lo) / bins as f64;

    let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0; bins];
    for v in pct {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Some(Histogram { edges, counts })
}
