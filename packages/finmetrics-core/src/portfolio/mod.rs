//! Equal-weight portfolio aggregation.
//!
//! Constituent return series are aligned on their common dates (inner join)
//! before averaging, then the portfolio returns are summarized with the
//! same algorithm as a single asset.

mod align;

pub use align::{align_returns, AlignedReturns};

use crate::metrics::{summarize_returns_with, summarize_with, EngineParams};
use crate::returns::{compute_returns, cumulative_returns};
use crate::types::{MetricsSummary, PriceSeries, ReturnSeries, Ticker};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of aggregating several assets into one equal-weight portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    /// Constituents that contributed, in ticker order
    pub tickers: Vec<Ticker>,
    pub summary: MetricsSummary,
    /// Equal-weight portfolio returns on the aligned dates
    pub returns: ReturnSeries,
    /// Aligned constituent returns used to build `returns`
    pub constituents: BTreeMap<Ticker, ReturnSeries>,
}

/// Wealth index curves of a portfolio and its constituents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeCurves {
    pub portfolio: Vec<(NaiveDate, f64)>,
    pub constituents: BTreeMap<Ticker, Vec<(NaiveDate, f64)>>,
}

impl PortfolioAnalysis {
    /// Number of constituents.
    pub fn size(&self) -> usize {
        self.tickers.len()
    }

    /// Equal weight carried by each constituent.
    pub fn weight(&self) -> f64 {
        1.0 / self.tickers.len() as f64
    }

    pub fn cumulative(&self) -> CumulativeCurves {
        CumulativeCurves {
            portfolio: cumulative_returns(&self.returns),
            constituents: self
                .constituents
                .iter()
                .map(|(ticker, returns)| (ticker.clone(), cumulative_returns(returns)))
                .collect(),
        }
    }
}

/// Aggregate price series into an equal-weight portfolio with default parameters.
///
/// Tickers whose series is empty are left out. Returns `None` if nothing is
/// left. With a single remaining ticker the result is that asset's own
/// summary.
pub fn aggregate(series_by_ticker: &BTreeMap<Ticker, PriceSeries>) -> Option<PortfolioAnalysis> {
    aggregate_with(series_by_ticker, &EngineParams::default())
}

/// [`aggregate`] with explicit parameters.
pub fn aggregate_with(
    series_by_ticker: &BTreeMap<Ticker, PriceSeries>,
    params: &EngineParams,
) -> Option<PortfolioAnalysis> {
    let usable: BTreeMap<&Ticker, &PriceSeries> = series_by_ticker
        .iter()
        .filter(|(_, series)| !series.is_empty())
        .collect();

    match usable.len() {
        0 => None,
        1 => {
            let (ticker, series) = usable.into_iter().next()?;
            let returns = compute_returns(series);
            Some(PortfolioAnalysis {
                tickers: vec![ticker.clone()],
                summary: summarize_with(series, params)?,
                constituents: BTreeMap::from([(ticker.clone(), returns.clone())]),
                returns,
            })
        }
        _ => {
            let raw: BTreeMap<Ticker, ReturnSeries> = usable
                .iter()
                .map(|(ticker, series)| ((*ticker).clone(), compute_returns(series)))
                .collect();
            let aligned = align_returns(&raw);
            let returns = aligned.equal_weight();

            Some(PortfolioAnalysis {
                tickers: raw.keys().cloned().collect(),
                summary: summarize_returns_with(&returns, params),
                constituents: aligned.to_series(),
                returns,
            })
        }
    }
}
