//! Request/response orchestration over a market data provider.
//!
//! An [`Analyzer`] fetches every requested ticker first, drops the ones
//! without data, and only then runs the per-asset, portfolio and risk
//! computations on the complete set.

use crate::config::Config;
use crate::metrics::{summarize_with, EngineParams};
use crate::portfolio::{aggregate_with, CumulativeCurves};
use crate::provider::{DateRange, MarketDataProvider};
use crate::risk::{correlation_matrix, value_at_risk, CorrelationMatrix, DEFAULT_VAR_CONFIDENCE};
use crate::types::{MetricsSummary, PriceSeries, RiskReturnPoint, Ticker, VarResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Metrics for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetReport {
    pub ticker: Ticker,
    /// Number of prices in the window
    pub observations: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub summary: MetricsSummary,
}

/// A requested ticker that was left out, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedTicker {
    pub ticker: Ticker,
    pub reason: String,
}

/// Equal-weight portfolio section of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    pub tickers: Vec<Ticker>,
    pub weight: f64,
    /// Number of aligned return observations
    pub observations: usize,
    pub summary: MetricsSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative: Option<CumulativeCurves>,
}

/// Everything computed for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub range: DateRange,
    pub assets: Vec<AssetReport>,
    pub excluded: Vec<ExcludedTicker>,
    /// Present with at least 2 assets
    pub portfolio: Option<PortfolioReport>,
    /// Present with at least 2 assets
    pub correlation: Option<CorrelationMatrix>,
    pub value_at_risk: Vec<VarResult>,
    pub risk_return: Vec<RiskReturnPoint>,
}

/// Runs analyses against a provider.
#[derive(Debug)]
pub struct Analyzer<P> {
    provider: P,
    params: EngineParams,
    var_confidence: f64,
    include_curves: bool,
}

impl<P: MarketDataProvider> Analyzer<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            params: EngineParams::default(),
            var_confidence: DEFAULT_VAR_CONFIDENCE,
            include_curves: false,
        }
    }

    /// Take engine parameters and VaR confidence from a config.
    pub fn from_config(provider: P, config: &Config) -> Self {
        Self::new(provider)
            .with_params(config.engine_params())
            .with_var_confidence(config.var_confidence)
    }

    pub fn with_params(mut self, params: EngineParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_var_confidence(mut self, confidence: f64) -> Self {
        self.var_confidence = confidence;
        self
    }

    /// Attach wealth index curves to the portfolio section.
    pub fn with_curves(mut self, include: bool) -> Self {
        self.include_curves = include;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetch and analyze `tickers` over `range`.
    ///
    /// Tickers that fail to fetch or have no prices in range are reported
    /// under `excluded`; the rest of the analysis proceeds without them.
    /// A ticker listed more than once is analyzed once, at its first
    /// position.
    pub fn run(&self, tickers: &[Ticker], range: DateRange) -> AnalysisReport {
        let mut seen = HashSet::new();
        let tickers: Vec<&Ticker> = tickers.iter().filter(|t| seen.insert(*t)).collect();
        tracing::info!(tickers = tickers.len(), %range, "Starting analysis");

        let mut fetched: Vec<(Ticker, PriceSeries)> = Vec::new();
        let mut excluded = Vec::new();
        for ticker in tickers {
            match self.provider.fetch(ticker, &range) {
                Ok(series) if series.is_empty() => {
                    tracing::warn!(%ticker, %range, "No prices in range, excluding");
                    excluded.push(ExcludedTicker {
                        ticker: ticker.clone(),
                        reason: format!("no prices between {} and {}", range.start, range.end),
                    });
                }
                Ok(series) => fetched.push((ticker.clone(), series)),
                Err(e) => {
                    tracing::warn!(%ticker, error = %e, "Fetch failed, excluding");
                    excluded.push(ExcludedTicker {
                        ticker: ticker.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let assets: Vec<AssetReport> = fetched
            .iter()
            .filter_map(|(ticker, series)| self.asset_report(ticker, series))
            .collect();

        let value_at_risk: Vec<VarResult> = fetched
            .iter()
            .filter_map(|(ticker, series)| {
                let var = value_at_risk(ticker, series, self.var_confidence);
                if var.is_none() {
                    tracing::debug!(%ticker, "Too few prices for VaR");
                }
                var
            })
            .collect();

        let risk_return = assets
            .iter()
            .map(|a| RiskReturnPoint {
                ticker: a.ticker.clone(),
                total_return_pct: a.summary.total_return_pct,
                annualized_volatility_pct: a.summary.annualized_volatility_pct,
            })
            .collect();

        let (portfolio, correlation) = if fetched.len() >= 2 {
            let by_ticker: BTreeMap<Ticker, PriceSeries> = fetched.into_iter().collect();
            (self.portfolio_report(&by_ticker), correlation_matrix(&by_ticker))
        } else {
            (None, None)
        };

        tracing::info!(
            assets = assets.len(),
            excluded = excluded.len(),
            portfolio = portfolio.is_some(),
            "Analysis complete"
        );

        AnalysisReport {
            range,
            assets,
            excluded,
            portfolio,
            correlation,
            value_at_risk,
            risk_return,
        }
    }

    fn asset_report(&self, ticker: &Ticker, series: &PriceSeries) -> Option<AssetReport> {
        Some(AssetReport {
            ticker: ticker.clone(),
            observations: series.len(),
            first_date: series.first()?.date,
            last_date: series.last()?.date,
            summary: summarize_with(series, &self.params)?,
        })
    }

    fn portfolio_report(&self, by_ticker: &BTreeMap<Ticker, PriceSeries>) -> Option<PortfolioReport> {
        let analysis = aggregate_with(by_ticker, &self.params)?;
        if analysis.returns.is_empty() {
            tracing::warn!("Constituents share no return dates, portfolio metrics are empty");
        }
        Some(PortfolioReport {
            tickers: analysis.tickers.clone(),
            weight: analysis.weight(),
            observations: analysis.returns.len(),
            cumulative: self.include_curves.then(|| analysis.cumulative()),
            summary: analysis.summary,
        })
    }
}
