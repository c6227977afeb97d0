//! Fixed classifier verdicts, typically loaded from a JSON file.
//!
//! ```json
//! {
//!   "BTC": {"direction": "BUY", "confidence": 0.7, "on_chain_score": 0.6, "kelly_fraction": 0.1},
//!   "ETH": {"direction": "NEUTRAL", "confidence": 0.5, "on_chain_score": 0.5, "kelly_fraction": 0.0}
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use regimelab_core::{ClassifierVerdict, MarketAnalysis, SignalClassifier, SourceError};

#[derive(Debug, Clone, Default)]
pub struct StaticClassifier {
    verdicts: BTreeMap<String, ClassifierVerdict>,
}

impl StaticClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verdict(mut self, symbol: impl Into<String>, verdict: ClassifierVerdict) -> Self {
        self.verdicts.insert(symbol.into(), verdict);
        self
    }

    /// Parse a JSON object of symbol → verdict; every verdict is validated.
    pub fn from_json(payload: &str) -> Result<Self, SourceError> {
        let raw: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(payload).map_err(|e| SourceError::Malformed {
                symbol: "*".into(),
                message: format!("verdict map: {e}"),
            })?;

        let mut verdicts = BTreeMap::new();
        for (symbol, value) in raw {
            let verdict = ClassifierVerdict::from_json(&value.to_string()).map_err(|e| {
                SourceError::Malformed {
                    symbol: symbol.clone(),
                    message: e.to_string(),
                }
            })?;
            verdicts.insert(symbol, verdict);
        }
        Ok(Self { verdicts })
    }

    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let payload = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
            symbol: "*".into(),
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_json(&payload)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.verdicts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}

impl SignalClassifier for StaticClassifier {
    fn name(&self) -> &str {
        "static"
    }

    fn classify(
        &self,
        symbol: &str,
        _analysis: &MarketAnalysis,
    ) -> Result<ClassifierVerdict, SourceError> {
        self.verdicts
            .get(symbol)
            .copied()
            .ok_or_else(|| SourceError::Unavailable(format!("no verdict for {symbol}")))
    }
}
