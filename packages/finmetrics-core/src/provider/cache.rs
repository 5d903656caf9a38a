//! In-memory memo for provider results.

use super::{DateRange, MarketDataProvider};
use crate::types::{PriceSeries, Ticker};
use crate::Result;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry {
    series: PriceSeries,
    expires_at: Instant,
}

type CacheKey = (Ticker, DateRange);

/// Wraps a provider and memoizes successful fetches per (ticker, range).
///
/// Failed fetches are never cached. A zero TTL disables caching.
#[derive(Debug)]
pub struct CachedProvider<P> {
    inner: P,
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl<P: MarketDataProvider> CachedProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Drop entries past their expiry.
    pub fn clear_expired(&self) {
        let now = Instant::now();
        self.entries().retain(|_, entry| entry.expires_at > now);
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        // The map stays consistent even if a holder panicked
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<P: MarketDataProvider> MarketDataProvider for CachedProvider<P> {
    fn fetch(&self, ticker: &Ticker, range: &DateRange) -> Result<PriceSeries> {
        let key = (ticker.clone(), *range);
        if let Some(entry) = self.entries().get(&key) {
            if Instant::now() <= entry.expires_at {
                tracing::debug!(%ticker, %range, "Price cache hit");
                return Ok(entry.series.clone());
            }
        }

        let series = self.inner.fetch(ticker, range)?;
        if !self.ttl.is_zero() {
            self.entries().insert(
                key,
                CacheEntry {
                    series: series.clone(),
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InMemoryProvider;
    use crate::Error;
    use chrono::NaiveDate;
    use std::cell::Cell;

    /// Counts calls and delegates to an in-memory provider.
    struct CountingProvider {
        inner: InMemoryProvider,
        calls: Cell<usize>,
    }

    impl MarketDataProvider for CountingProvider {
        fn fetch(&self, ticker: &Ticker, range: &DateRange) -> Result<PriceSeries> {
            self.calls.set(self.calls.get() + 1);
            self.inner.fetch(ticker, range)
        }
    }

    fn counting() -> CountingProvider {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let series = PriceSeries::from_closes(vec![(d(2), 10.0), (d(3), 11.0)]);
        CountingProvider {
            inner: InMemoryProvider::new().with_series("AAA", series),
            calls: Cell::new(0),
        }
    }

    fn range() -> DateRange {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        DateRange::new(d(1), d(31)).unwrap()
    }

    #[test]
    fn test_second_fetch_is_served_from_cache() {
        let cached = CachedProvider::new(counting(), Duration::from_secs(3600));
        let ticker = Ticker::new("AAA");

        let first = cached.fetch(&ticker, &range()).unwrap();
        let second = cached.fetch(&ticker, &range()).unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner().calls.get(), 1);
        assert_eq!(cached.len(), 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cached = CachedProvider::new(counting(), Duration::from_secs(3600));
        let ticker = Ticker::new("ZZZ");

        assert!(matches!(cached.fetch(&ticker, &range()), Err(Error::NoData(_))));
        assert!(cached.fetch(&ticker, &range()).is_err());
        assert_eq!(cached.inner().calls.get(), 2);
        assert!(cached.is_empty());
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cached = CachedProvider::new(counting(), Duration::ZERO);
        let ticker = Ticker::new("AAA");

        cached.fetch(&ticker, &range()).unwrap();
        cached.fetch(&ticker, &range()).unwrap();
        assert_eq!(cached.inner().calls.get(), 2);
    }

    #[test]
    fn test_expired_entries_refetch() {
        let cached = CachedProvider::new(counting(), Duration::from_millis(20));
        let ticker = Ticker::new("AAA");

        cached.fetch(&ticker, &range()).unwrap();
        std::thread::sleep(Duration::from_millis(40));
        cached.fetch(&ticker, &range()).unwrap();
        assert_eq!(cached.inner().calls.get(), 2);

        std::thread::sleep(Duration::from_millis(40));
        cached.clear_expired();
        assert!(cached.is_empty());
    }

    #[test]
    fn test_clear() {
        let cached = CachedProvider::new(counting(), Duration::from_secs(60));
        cached.fetch(&Ticker::new("AAA"), &range()).unwrap();
        cached.clear();
        assert!(cached.is_empty());
    }
}
