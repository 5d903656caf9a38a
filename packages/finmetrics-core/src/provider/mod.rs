//! Market data provider seam.
//!
//! The engine never fetches prices itself. Callers hand it series obtained
//! through a [`MarketDataProvider`]; this module defines that trait, the
//! date range it is queried with, and a few implementations.

mod cache;
mod json_file;

pub use cache::CachedProvider;
pub use json_file::JsonFileProvider;

use crate::types::{PriceSeries, Ticker};
use crate::{Error, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Source of daily price series.
pub trait MarketDataProvider {
    /// Fetch the series for `ticker` restricted to `range` (inclusive).
    ///
    /// An `Ok` result may be empty when the ticker exists but has no prices
    /// in the range.
    fn fetch(&self, ticker: &Ticker, range: &DateRange) -> Result<PriceSeries>;
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidDateRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// The `period` ending on `end`.
    pub fn trailing(period: Period, end: NaiveDate) -> Self {
        let start = end
            .checked_sub_days(Days::new(period.days()))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Preset look-back windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    #[default]
    OneYear,
    #[serde(rename = "2Y")]
    TwoYears,
    #[serde(rename = "5Y")]
    FiveYears,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
    ];

    /// Calendar days covered.
    pub fn days(self) -> u64 {
        match self {
            Period::OneMonth => 30,
            Period::ThreeMonths => 90,
            Period::SixMonths => 180,
            Period::OneYear => 365,
            Period::TwoYears => 730,
            Period::FiveYears => 1825,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::OneMonth => "1M",
            Period::ThreeMonths => "3M",
            Period::SixMonths => "6M",
            Period::OneYear => "1Y",
            Period::TwoYears => "2Y",
            Period::FiveYears => "5Y",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_uppercase();
        Period::ALL
            .into_iter()
            .find(|p| p.label() == wanted)
            .ok_or_else(|| {
                Error::InvalidPeriod(format!("{} (expected one of 1M, 3M, 6M, 1Y, 2Y, 5Y)", s))
            })
    }
}

/// Provider backed by series held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    series: HashMap<Ticker, PriceSeries>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ticker: Ticker, series: PriceSeries) {
        self.series.insert(ticker, series);
    }

    pub fn with_series(mut self, ticker: &str, series: PriceSeries) -> Self {
        self.insert(Ticker::new(ticker), series);
        self
    }
}

impl MarketDataProvider for InMemoryProvider {
    fn fetch(&self, ticker: &Ticker, range: &DateRange) -> Result<PriceSeries> {
        let series = self
            .series
            .get(ticker)
            .ok_or_else(|| Error::NoData(ticker.to_string()))?;
        Ok(PriceSeries::new(
            series
                .points()
                .iter()
                .filter(|p| range.contains(p.date))
                .copied()
                .collect(),
        ))
    }
}
