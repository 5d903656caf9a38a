//! Single-asset risk/return summary.
//!
//! Provides total return, annualized volatility, Sharpe ratio and maximum
//! drawdown. Undefined values are reported as `None`; the two intentional
//! neutral defaults are a zero Sharpe ratio for zero-variance returns and a
//! zero drawdown for an empty return series.

use crate::returns::compute_returns;
use crate::stats::{mean, sample_std_dev};
use crate::types::{MetricsSummary, PriceSeries, ReturnSeries};
use serde::{Deserialize, Serialize};

/// Annual risk-free rate used when none is configured.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// Trading periods per year used for annualization.
pub const DEFAULT_PERIODS_PER_YEAR: u32 = 252;

/// Parameters of the annualized calculations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    /// Annual risk-free rate (e.g., 0.02 for 2%)
    pub risk_free_rate: f64,
    /// Number of return periods in one year
    pub periods_per_year: u32,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
        }
    }
}

impl EngineParams {
    fn annualization(&self) -> f64 {
        f64::from(self.periods_per_year).sqrt()
    }

    fn periodic_risk_free(&self) -> f64 {
        self.risk_free_rate / f64::from(self.periods_per_year)
    }
}

/// Summarize a price series with the default parameters.
///
/// Returns `None` when the series holds no prices.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use finmetrics_core::metrics::summarize;
/// use finmetrics_core::types::PriceSeries;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
/// let prices = PriceSeries::from_closes(vec![(d(2), 100.0), (d(3), 110.0), (d(4), 121.0)]);
/// let summary = summarize(&prices).unwrap();
///
/// assert_eq!(summary.current_price, Some(121.0));
/// assert!((summary.total_return_pct.unwrap() - 21.0).abs() < 1e-9);
/// ```
pub fn summarize(series: &PriceSeries) -> Option<MetricsSummary> {
    summarize_with(series, &EngineParams::default())
}

/// Summarize a price series with explicit parameters.
pub fn summarize_with(series: &PriceSeries, params: &EngineParams) -> Option<MetricsSummary> {
    let first = series.first()?.close;
    let current_price = series.last()?.close;
    let total_return_pct = (current_price - first) / first * 100.0;

    let returns = compute_returns(series);
    Some(MetricsSummary {
        current_price: Some(current_price),
        total_return_pct: Some(total_return_pct),
        ..summarize_returns_with(&returns, params)
    })
}

/// Summarize a return series directly, skipping the price-differencing step.
///
/// `current_price` is always `None`; `total_return_pct` is the compounded
/// return of the series, or `None` when it is empty.
pub fn summarize_returns(returns: &ReturnSeries) -> MetricsSummary {
    summarize_returns_with(returns, &EngineParams::default())
}

/// [`summarize_returns`] with explicit parameters.
pub fn summarize_returns_with(returns: &ReturnSeries, params: &EngineParams) -> MetricsSummary {
    let r = returns.values();
    let total_return_pct = if r.is_empty() {
        None
    } else {
        Some((r.iter().map(|v| 1.0 + v).product::<f64>() - 1.0) * 100.0)
    };

    MetricsSummary {
        current_price: None,
        total_return_pct,
        annualized_volatility_pct: annualized_volatility_pct(&r, params),
        sharpe_ratio: sharpe_ratio(&r, params),
        max_drawdown_pct: max_drawdown_pct(&r),
    }
}

/// Annualized volatility in percent from periodic returns.
///
/// Uses the sample standard deviation; `None` with fewer than 2 returns.
pub fn annualized_volatility_pct(returns: &[f64], params: &EngineParams) -> Option<f64> {
    sample_std_dev(returns).map(|std| std * params.annualization() * 100.0)
}

/// Annualized Sharpe ratio from periodic returns.
///
/// `mean(r - rf) / std(r) * sqrt(periods)`, where `rf` is the per-period
/// risk-free rate. Zero-variance returns, including constant non-zero ones
/// whose computed spread is rounding noise, give `Some(0.0)`; fewer than 2
/// returns give `None`.
pub fn sharpe_ratio(returns: &[f64], params: &EngineParams) -> Option<f64> {
    let std = sample_std_dev(returns)?;
    if std == 0.0 {
        return Some(0.0);
    }

    let rf = params.periodic_risk_free();
    let excess: Vec<f64> = returns.iter().map(|r| r - rf).collect();
    let mean_excess = mean(&excess)?;
    Some(mean_excess / std * params.annualization())
}

/// Maximum drawdown in percent from periodic returns.
///
/// The wealth index starts at `1 + r[0]`, so the first period can never
/// register as a drawdown. The result is `<= 0`, and `0` for an empty input.
pub fn max_drawdown_pct(returns: &[f64]) -> f64 {
    let mut wealth = 1.0;
    let mut running_max = f64::NEG_INFINITY;
    let mut max_drawdown = 0.0_f64;

    for r in returns {
        wealth *= 1.0 + r;
        running_max = running_max.max(wealth);
        let drawdown = (wealth - running_max) / running_max;
        max_drawdown = max_drawdown.min(drawdown);
    }

    max_drawdown * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::{Days, NaiveDate};

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        PriceSeries::from_closes(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| (start + Days::new(i as u64), c)),
        )
    }

    #[test]
    fn test_empty_series_is_absent() {
        assert!(summarize(&PriceSeries::default()).is_none());
    }

    #[test]
    fn test_single_price_leaves_history_fields_absent() {
        let summary = summarize(&series(&[250.0])).unwrap();

        assert_eq!(summary.current_price, Some(250.0));
        assert_eq!(summary.total_return_pct, Some(0.0));
        assert_eq!(summary.annualized_volatility_pct, None);
        assert_eq!(summary.sharpe_ratio, None);
        assert_eq!(summary.max_drawdown_pct, 0.0);
    }

    #[test]
    fn test_two_prices_still_lack_volatility() {
        let summary = summarize(&series(&[100.0, 95.0])).unwrap();

        assert_relative_eq!(summary.total_return_pct.unwrap(), -5.0, epsilon = 1e-9);
        assert_eq!(summary.annualized_volatility_pct, None);
        assert_eq!(summary.sharpe_ratio, None);
        assert_relative_eq!(summary.max_drawdown_pct, 0.0);
    }

    #[test]
    fn test_constant_prices_are_neutral() {
        let summary = summarize(&series(&[100.0; 30])).unwrap();

        assert_eq!(summary.current_price, Some(100.0));
        assert_eq!(summary.total_return_pct, Some(0.0));
        assert_eq!(summary.annualized_volatility_pct, Some(0.0));
        assert_eq!(summary.sharpe_ratio, Some(0.0));
        assert_eq!(summary.max_drawdown_pct, 0.0);
    }

    #[test]
    fn test_constant_nonzero_returns_have_zero_sharpe() {
        let params = EngineParams::default();
        assert_eq!(sharpe_ratio(&[0.01; 10], &params), Some(0.0));
        assert_eq!(sharpe_ratio(&[0.1, 0.1, 0.1], &params), Some(0.0));
        assert_eq!(sharpe_ratio(&[-0.002; 40], &params), Some(0.0));
        assert_eq!(annualized_volatility_pct(&[0.01; 10], &params), Some(0.0));
    }

    #[test]
    fn test_steady_growth_prices_are_degenerate() {
        // 1% a day, every day: returns differ only by rounding
        let mut price = 100.0;
        let mut closes = Vec::new();
        for _ in 0..30 {
            closes.push(price);
            price *= 1.01;
        }
        let summary = summarize(&series(&closes)).unwrap();

        assert_eq!(summary.sharpe_ratio, Some(0.0));
        assert_eq!(summary.annualized_volatility_pct, Some(0.0));
        assert_eq!(summary.max_drawdown_pct, 0.0);
        assert_relative_eq!(
            summary.total_return_pct.unwrap(),
            (1.01_f64.powi(29) - 1.0) * 100.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_total_return_compounds() {
        let summary = summarize(&series(&[100.0, 110.0, 121.0])).unwrap();
        assert_relative_eq!(summary.total_return_pct.unwrap(), 21.0, epsilon = 1e-9);
        // Both returns are exactly 10%, so volatility collapses to 0
        assert_abs_diff_eq!(summary.annualized_volatility_pct.unwrap(), 0.0, epsilon = 1e-9);
        assert_eq!(summary.sharpe_ratio, Some(0.0));
    }

    #[test]
    fn test_volatility_and_sharpe_values() {
        let returns = [0.01, -0.02, 0.015, 0.005];
        let params = EngineParams::default();

        let n = returns.len() as f64;
        let m = returns.iter().sum::<f64>() / n;
        let std = (returns.iter().map(|r| (r - m).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();

        let vol = annualized_volatility_pct(&returns, &params).unwrap();
        assert_relative_eq!(vol, std * 252.0_f64.sqrt() * 100.0, epsilon = 1e-12);

        let sharpe = sharpe_ratio(&returns, &params).unwrap();
        let expected = (m - 0.02 / 252.0) / std * 252.0_f64.sqrt();
        assert_relative_eq!(sharpe, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_sharpe_sign_follows_excess_return() {
        let params = EngineParams::default();
        let good = [0.002, 0.001, 0.003, 0.002];
        let bad = [-0.002, -0.001, -0.003, -0.002];

        assert!(sharpe_ratio(&good, &params).unwrap() > 0.0);
        assert!(sharpe_ratio(&bad, &params).unwrap() < 0.0);
    }

    #[test]
    fn test_custom_risk_free_rate() {
        let returns = [0.01, 0.0, 0.02, -0.01];
        let zero_rf = EngineParams {
            risk_free_rate: 0.0,
            ..EngineParams::default()
        };
        let high_rf = EngineParams {
            risk_free_rate: 0.10,
            ..EngineParams::default()
        };
        assert!(sharpe_ratio(&returns, &zero_rf).unwrap() > sharpe_ratio(&returns, &high_rf).unwrap());
    }

    #[test]
    fn test_max_drawdown() {
        // Wealth: 1.10, 1.155, 0.98175, 0.883575, 0.92775375
        let returns = [0.10, 0.05, -0.15, -0.10, 0.05];
        let mdd = max_drawdown_pct(&returns);

        let expected = (0.883575 - 1.155) / 1.155 * 100.0;
        assert_relative_eq!(mdd, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_max_drawdown_first_period_loss_not_counted() {
        // W[0] = 0.9 is its own running peak
        assert_eq!(max_drawdown_pct(&[-0.10]), 0.0);
        assert_relative_eq!(max_drawdown_pct(&[-0.10, -0.10]), -10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_max_drawdown_zero_iff_non_decreasing() {
        assert_eq!(max_drawdown_pct(&[]), 0.0);
        assert_eq!(max_drawdown_pct(&[0.01, 0.0, 0.03, 0.01]), 0.0);
        assert!(max_drawdown_pct(&[0.01, -0.001, 0.03]) < 0.0);
    }

    #[test]
    fn test_max_drawdown_never_positive() {
        let samples: [&[f64]; 4] = [
            &[0.5, -0.2, 0.1],
            &[-0.3, -0.3, -0.3],
            &[0.01; 20],
            &[0.2, -0.5, 0.9, -0.1],
        ];
        for returns in samples {
            assert!(max_drawdown_pct(returns) <= 0.0);
        }
    }

    #[test]
    fn test_summarize_returns_matches_price_path() {
        let prices = series(&[100.0, 103.0, 98.0, 101.0, 107.0]);
        let from_prices = summarize(&prices).unwrap();
        let from_returns = summarize_returns(&compute_returns(&prices));

        assert_eq!(from_returns.current_price, None);
        assert_relative_eq!(
            from_returns.total_return_pct.unwrap(),
            from_prices.total_return_pct.unwrap(),
            epsilon = 1e-9
        );
        assert_eq!(from_returns.annualized_volatility_pct, from_prices.annualized_volatility_pct);
        assert_eq!(from_returns.sharpe_ratio, from_prices.sharpe_ratio);
        assert_eq!(from_returns.max_drawdown_pct, from_prices.max_drawdown_pct);
    }

    #[test]
    fn test_summarize_returns_empty() {
        let summary = summarize_returns(&ReturnSeries::default());
        assert_eq!(summary.total_return_pct, None);
        assert_eq!(summary.annualized_volatility_pct, None);
        assert_eq!(summary.sharpe_ratio, None);
        assert_eq!(summary.max_drawdown_pct, 0.0);
    }

    #[test]
    fn test_summarize_is_deterministic() {
        let prices = series(&[10.0, 10.4, 9.7, 10.9, 11.3, 10.1]);
        let a = summarize(&prices).unwrap();
        let b = summarize(&prices).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.sharpe_ratio.unwrap().to_bits(),
            b.sharpe_ratio.unwrap().to_bits()
        );
    }
}
