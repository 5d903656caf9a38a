//! Cross-asset correlation of aligned returns.

use crate::portfolio::align_returns;
use crate::returns::compute_returns;
use crate::stats::pearson;
use crate::types::{PriceSeries, ReturnSeries, Ticker};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Symmetric matrix of Pearson correlations between tickers.
///
/// Row and column order follow `tickers`. The diagonal is fixed at 1.0.
/// An off-diagonal entry is `None` when the coefficient is undefined, which
/// happens with fewer than 2 common dates or a zero-variance column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub tickers: Vec<Ticker>,
    pub values: Vec<Vec<Option<f64>>>,
    /// Number of aligned return observations used
    pub observations: usize,
}

impl CorrelationMatrix {
    fn index_of(&self, ticker: &Ticker) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }

    /// Correlation between two tickers.
    ///
    /// `None` if either ticker is not in the matrix or the coefficient is
    /// undefined.
    pub fn get(&self, a: &Ticker, b: &Ticker) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        self.values[i][j]
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.values.len();
        (0..n).all(|i| (0..n).all(|j| self.values[i][j] == self.values[j][i]))
    }
}

/// Correlation matrix of the returns of each price series.
///
/// Returns are aligned on their common dates first. Tickers with an empty
/// series are ignored; `None` is returned when fewer than 2 remain.
pub fn correlation_matrix(
    series_by_ticker: &BTreeMap<Ticker, PriceSeries>,
) -> Option<CorrelationMatrix> {
    let returns: BTreeMap<Ticker, ReturnSeries> = series_by_ticker
        .iter()
        .filter(|(_, series)| !series.is_empty())
        .map(|(ticker, series)| (ticker.clone(), compute_returns(series)))
        .collect();
    if returns.len() < 2 {
        return None;
    }

    let aligned = align_returns(&returns);
    let tickers: Vec<Ticker> = aligned.columns.keys().cloned().collect();
    let columns: Vec<&Vec<f64>> = aligned.columns.values().collect();
    let n = tickers.len();

    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        values[i][i] = Some(1.0);
        for j in (i + 1)..n {
            let r = pearson(columns[i], columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Some(CorrelationMatrix {
        tickers,
        values,
        observations: aligned.len(),
    })
}
