//! Inner-join alignment of return series on their dates.

use crate::types::{ReturnPoint, ReturnSeries, Ticker};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Return columns sharing one date index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedReturns {
    /// Dates present in every input series, ascending
    pub dates: Vec<NaiveDate>,
    /// One column per ticker, each `dates.len()` long
    pub columns: BTreeMap<Ticker, Vec<f64>>,
}

impl AlignedReturns {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Equal-weight mean across columns at each date.
    pub fn equal_weight(&self) -> ReturnSeries {
        let n = self.columns.len();
        if n == 0 {
            return ReturnSeries::default();
        }
        let weight = 1.0 / n as f64;

        ReturnSeries::new(
            self.dates
                .iter()
                .enumerate()
                .map(|(i, &date)| ReturnPoint {
                    date,
                    value: self.columns.values().map(|col| col[i]).sum::<f64>() * weight,
                })
                .collect(),
        )
    }

    /// Rebuild each column as a dated series.
    pub fn to_series(&self) -> BTreeMap<Ticker, ReturnSeries> {
        self.columns
            .iter()
            .map(|(ticker, values)| {
                let points = self
                    .dates
                    .iter()
                    .zip(values)
                    .map(|(&date, &value)| ReturnPoint { date, value })
                    .collect();
                (ticker.clone(), ReturnSeries::new(points))
            })
            .collect()
    }
}

/// Align return series on the dates common to all of them.
///
/// A date missing from any one series is dropped from every column. If a
/// series repeats a date the later value wins.
pub fn align_returns(series_by_ticker: &BTreeMap<Ticker, ReturnSeries>) -> AlignedReturns {
    let by_date: BTreeMap<&Ticker, BTreeMap<NaiveDate, f64>> = series_by_ticker
        .iter()
        .map(|(ticker, series)| {
            let values: BTreeMap<NaiveDate, f64> =
                series.points().iter().map(|p| (p.date, p.value)).collect();
            (ticker, values)
        })
        .collect();

    let mut common: Option<BTreeSet<NaiveDate>> = None;
    for values in by_date.values() {
        let dates: BTreeSet<NaiveDate> = values.keys().copied().collect();
        common = Some(match common {
            None => dates,
            Some(acc) => acc.intersection(&dates).copied().collect(),
        });
    }
    let dates: Vec<NaiveDate> = common.unwrap_or_default().into_iter().collect();

    let columns = by_date
        .into_iter()
        .map(|(ticker, values)| {
            let column: Vec<f64> = dates
                .iter()
                .filter_map(|date| values.get(date).copied())
                .collect();
            (ticker.clone(), column)
        })
        .collect();

    AlignedReturns { dates, columns }
}
