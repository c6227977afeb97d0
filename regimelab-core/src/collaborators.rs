//! Contracts for the systems around the core.
//!
//! A `CandleSource` supplies validated series, a `SignalClassifier` turns an
//! analysis into a directional verdict. Implementations live outside the core
//! (CSV files, synthetic data, fixed verdicts) so they can be swapped and
//! mocked in tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analyzer::MarketAnalysis;
use crate::domain::{CandleSeries, TradeDirection};
use crate::error::AnalyticsError;

/// Failures reported by collaborators.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("I/O error for {symbol}: {message}")]
    Io { symbol: String, message: String },

    #[error("malformed data for {symbol}: {message}")]
    Malformed { symbol: String, message: String },

    #[error("classifier unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

/// Supplies a candle series per symbol.
pub trait CandleSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    fn fetch(&self, symbol: &str) -> Result<CandleSeries, SourceError>;
}

/// Produces a directional verdict for an analysed symbol.
pub trait SignalClassifier: Send + Sync {
    fn name(&self) -> &str;

    fn classify(&self, symbol: &str, analysis: &MarketAnalysis)
        -> Result<ClassifierVerdict, SourceError>;
}

/// Direction and the confidence inputs the calibrator consumes.
///
/// All numbers are fractions in `[0, 1]`. Without a `kelly_fraction` the
/// analyzer estimates one from the confidence and its trade journal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierVerdict {
    pub direction: TradeDirection,
    pub confidence: f64,
    pub on_chain_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kelly_fraction: Option<f64>,
}

impl ClassifierVerdict {
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        let fields = [
            ("confidence", Some(self.confidence)),
            ("on_chain_score", Some(self.on_chain_score)),
            ("kelly_fraction", self.kelly_fraction),
        ];
        for (name, value) in fields {
            let Some(value) = value else { continue };
            if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
                return Err(AnalyticsError::InvalidInput(format!(
                    "verdict {name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate an untyped JSON payload.
    pub fn from_json(payload: &str) -> Result<Self, AnalyticsError> {
        let verdict: Self = serde_json::from_str(payload)
            .map_err(|e| AnalyticsError::InvalidInput(format!("verdict payload: {e}")))?;
        verdict.validate()?;
        Ok(verdict)
    }
}
