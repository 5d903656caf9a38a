//! Price series stored as one JSON file per ticker.

use super::{DateRange, MarketDataProvider};
use crate::types::{PricePoint, PriceSeries, Ticker};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One row as exported by common market data tools.
///
/// Column names are accepted in either casing.
#[derive(Debug, Deserialize)]
struct RawBar {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(default, alias = "Volume")]
    volume: Option<u64>,
}

/// Reads `<dir>/<TICKER>.json`, an array of `{date, close, volume?}` rows.
///
/// Rows are sorted by date, repeated dates keep the last row, and rows with
/// a non-positive or non-finite close are dropped.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    dir: PathBuf,
}

impl JsonFileProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `ticker`.
    ///
    /// Tickers that could name a file outside the data directory (empty,
    /// containing a path separator, or containing `..`) are rejected.
    pub fn path_for(&self, ticker: &Ticker) -> Result<PathBuf> {
        let symbol = ticker.as_str();
        if symbol.is_empty() || symbol.contains(['/', '\\']) || symbol.contains("..") {
            return Err(Error::InvalidTicker(symbol.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", symbol)))
    }

    /// Parse a whole file without range filtering.
    pub fn load_file(path: &Path) -> Result<PriceSeries> {
        let content = fs::read_to_string(path)?;
        parse_bars(&content, None)
    }
}

impl MarketDataProvider for JsonFileProvider {
    fn fetch(&self, ticker: &Ticker, range: &DateRange) -> Result<PriceSeries> {
        let path = self.path_for(ticker)?;
        if !path.exists() {
            return Err(Error::NoData(format!(
                "{} (no file at {})",
                ticker,
                path.display()
            )));
        }

        tracing::debug!(%ticker, %range, path = %path.display(), "Reading price file");
        let content = fs::read_to_string(&path)?;
        let series = parse_bars(&content, Some(range))?;
        tracing::debug!(%ticker, points = series.len(), "Loaded price series");
        Ok(series)
    }
}

fn parse_bars(content: &str, range: Option<&DateRange>) -> Result<PriceSeries> {
    let rows: Vec<RawBar> = serde_json::from_str(content)?;

    let mut by_date = BTreeMap::new();
    for row in rows {
        if range.is_some_and(|r| !r.contains(row.date)) {
            continue;
        }
        if !row.close.is_finite() || row.close <= 0.0 {
            tracing::warn!(date = %row.date, close = row.close, "Skipping row with invalid close");
            continue;
        }
        by_date.insert(
            row.date,
            PricePoint {
                date: row.date,
                close: row.close,
                volume: row.volume,
            },
        );
    }

    Ok(PriceSeries::new(by_date.into_values().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_fetch_sorts_dedups_and_filters() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "AAPL.json",
            r#"[
                {"date": "2024-01-04", "close": 103.0},
                {"date": "2024-01-02", "close": 101.0, "volume": 1200},
                {"date": "2024-01-03", "close": 102.0},
                {"date": "2024-01-03", "close": 102.5},
                {"date": "2024-01-09", "close": 110.0}
            ]"#,
        );

        let provider = JsonFileProvider::new(dir.path());
        let range = DateRange::new(date(1), date(5)).unwrap();
        let series = provider.fetch(&Ticker::new("aapl"), &range).unwrap();

        assert_eq!(series.closes(), vec![101.0, 102.5, 103.0]);
        assert_eq!(series.first().unwrap().volume, Some(1200));
        assert_eq!(series.last().unwrap().volume, None);
    }

    #[test]
    fn test_fetch_accepts_capitalized_columns() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "MSFT.json",
            r#"[{"Date": "2024-01-02", "Close": 370.0, "Volume": 10}]"#,
        );

        let provider = JsonFileProvider::new(dir.path());
        let range = DateRange::new(date(1), date(31)).unwrap();
        let series = provider.fetch(&Ticker::new("MSFT"), &range).unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.points()[0].volume, Some(10));
    }

    #[test]
    fn test_fetch_drops_invalid_closes() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "BAD.json",
            r#"[
                {"date": "2024-01-02", "close": 0.0},
                {"date": "2024-01-03", "close": -5.0},
                {"date": "2024-01-04", "close": 7.0}
            ]"#,
        );

        let provider = JsonFileProvider::new(dir.path());
        let range = DateRange::new(date(1), date(31)).unwrap();
        let series = provider.fetch(&Ticker::new("BAD"), &range).unwrap();
        assert_eq!(series.closes(), vec![7.0]);
    }

    #[test]
    fn test_missing_file_is_no_data() {
        let dir = tempdir().unwrap();
        let provider = JsonFileProvider::new(dir.path());
        let range = DateRange::new(date(1), date(31)).unwrap();

        let result = provider.fetch(&Ticker::new("NOPE"), &range);
        assert!(matches!(result, Err(Error::NoData(_))));
    }

    #[test]
    fn test_malformed_file_is_json_error() {
        let dir = tempdir().unwrap();
        write(dir.path(), "ODD.json", r#"{"not": "an array"}"#);

        let provider = JsonFileProvider::new(dir.path());
        let range = DateRange::new(date(1), date(31)).unwrap();
        let result = provider.fetch(&Ticker::new("ODD"), &range);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_path_like_tickers_are_rejected() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir(&data).unwrap();
        write(dir.path(), "SECRET.json", r#"[{"date": "2024-01-02", "close": 1.0}]"#);

        let provider = JsonFileProvider::new(&data);
        let range = DateRange::new(date(1), date(31)).unwrap();
        for symbol in ["../secret", "..", "a/b", "a\\b", ""] {
            let result = provider.fetch(&Ticker::new(symbol), &range);
            assert!(matches!(result, Err(Error::InvalidTicker(_))), "{symbol:?}");
        }

        assert_eq!(
            provider.path_for(&Ticker::new("brk.b")).unwrap(),
            data.join("BRK.B.json")
        );
    }

    #[test]
    fn test_load_file_keeps_everything() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "ALL.json",
            r#"[{"date": "2019-05-01", "close": 1.0}, {"date": "2024-05-01", "close": 2.0}]"#,
        );

        let series = JsonFileProvider::load_file(&dir.path().join("ALL.json")).unwrap();
        assert_eq!(series.len(), 2);
    }
}
