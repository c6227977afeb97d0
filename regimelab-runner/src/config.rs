//! Batch configuration, loaded from TOML.
//!
//! ```toml
//! data_dir = "data"
//! symbols = ["BTC", "ETH"]   # empty: every <SYMBOL>.csv in data_dir
//! verdicts = "verdicts.json"
//! parallel = true
//! trade_returns = [0.031, -0.012, 0.024]   # realised outcomes, oldest first
//!
//! [analyzer]
//! signal_validity_ms = 7200000
//!
//! [analyzer.periods]
//! rsi = 14
//! ema_short = 12
//! ema_long = 26
//! ```

use std::path::{Path, PathBuf};

use regimelab_core::risk::TradeJournal;
use regimelab_core::{AnalyzerConfig, MarketAnalyzer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Directory holding one `<SYMBOL>.csv` per symbol.
    pub data_dir: PathBuf,
    /// Symbols to analyse; empty means every CSV in `data_dir`.
    pub symbols: Vec<String>,
    /// JSON map of symbol → classifier verdict.
    pub verdicts: Option<PathBuf>,
    /// Fan symbols out across the rayon pool.
    pub parallel: bool,
    /// Memoise indicator snapshots by series fingerprint.
    pub cache_snapshots: bool,
    /// Realised trade returns, oldest first. Seeds the journal behind Kelly
    /// estimates for verdicts without a `kelly_fraction`.
    pub trade_returns: Vec<f64>,
    pub analyzer: AnalyzerConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            symbols: Vec::new(),
            verdicts: None,
            parallel: true,
            cache_snapshots: true,
            trade_returns: Vec::new(),
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analyzer
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if let Some(bad) = self.symbols.iter().find(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("empty symbol name {bad:?}")));
        }
        if let Some(bad) = self.trade_returns.iter().find(|r| !r.is_finite()) {
            return Err(ConfigError::Invalid(format!("trade return {bad} is not finite")));
        }
        Ok(())
    }

    /// Analyzer with these settings and a journal seeded from `trade_returns`.
    pub fn build_analyzer(&self) -> Result<MarketAnalyzer, ConfigError> {
        let analyzer =
            MarketAnalyzer::new(self.analyzer).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(analyzer.with_journal(TradeJournal::from_returns(
            self.trade_returns.iter().copied(),
        )))
    }
}

/// Analyzer for single-series commands: defaults without a config file.
pub fn load_analyzer(path: Option<&Path>) -> Result<MarketAnalyzer, ConfigError> {
    match path {
        Some(path) => BatchConfig::from_file(path)?.build_analyzer(),
        None => BatchConfig::default().build_analyzer(),
    }
}
