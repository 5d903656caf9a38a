//! Engine and CLI configuration.
//!
//! Loaded from a TOML file. Default path: `<config dir>/finmetrics/config.toml`,
//! overridable with the `FINMETRICS_CONFIG` environment variable. A missing
//! file yields the defaults. `FINMETRICS_DATA_DIR` overrides `data_dir`.

use crate::metrics::{EngineParams, DEFAULT_PERIODS_PER_YEAR, DEFAULT_RISK_FREE_RATE};
use crate::provider::Period;
use crate::risk::DEFAULT_VAR_CONFIDENCE;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "FINMETRICS_CONFIG";
pub const DATA_DIR_ENV: &str = "FINMETRICS_DATA_DIR";

/// Effective configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `<TICKER>.json` price files
    pub data_dir: PathBuf,
    /// Annual risk-free rate for the Sharpe ratio
    pub risk_free_rate: f64,
    /// Return periods per year used for annualization
    pub periods_per_year: u32,
    /// Confidence level for historical VaR
    pub var_confidence: f64,
    /// How long fetched series are memoized, in seconds (0 disables)
    pub cache_ttl_secs: u64,
    /// Look-back window used when none is given
    pub default_period: Period,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: Self::default_data_dir(),
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
            var_confidence: DEFAULT_VAR_CONFIDENCE,
            cache_ttl_secs: 3600,
            default_period: Period::default(),
        }
    }
}

impl Config {
    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let config = Self::load_from_path(&Self::default_path())?;
        let config = match env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => config.with_data_dir(dir),
            _ => config,
        };
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }

        directories::ProjectDirs::from("", "", "finmetrics")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("finmetrics.toml"))
    }

    fn default_data_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", "finmetrics")
            .map(|dirs| dirs.data_dir().join("prices"))
            .unwrap_or_else(|| PathBuf::from("prices"))
    }

    /// Load a config file; a missing file gives the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.var_confidence > 0.0 && self.var_confidence < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "var_confidence must be between 0 and 1 (exclusive), got {}",
                self.var_confidence
            )));
        }
        if self.periods_per_year == 0 {
            return Err(Error::InvalidConfig(
                "periods_per_year must be positive".to_string(),
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(Error::InvalidConfig(
                "risk_free_rate must be a finite number".to_string(),
            ));
        }
        Ok(())
    }

    pub fn engine_params(&self) -> EngineParams {
        EngineParams {
            risk_free_rate: self.risk_free_rate,
            periods_per_year: self.periods_per_year,
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
