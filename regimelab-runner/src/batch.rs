//! Multi-symbol analysis.
//!
//! Each symbol is fetched, analysed and (when a classifier is present) turned
//! into a signal independently, so symbols fan out across the rayon pool and
//! one bad symbol never aborts the batch.

use std::sync::Arc;

use rayon::prelude::*;
use regimelab_core::{
    AnalyticsError, CandleSource, MarketAnalysis, MarketAnalyzer, SignalClassifier, SourceError,
    TradeDirection, TradeSignal,
};
use serde::Serialize;
use thiserror::Error;

use crate::cache::SnapshotCache;
use crate::candle_source::CsvCandleSource;
use crate::classifier::StaticClassifier;
use crate::config::{BatchConfig, ConfigError};

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

/// What happened to one symbol.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SymbolOutcome {
    /// Full trade signal.
    Signal { signal: Box<TradeSignal> },
    /// Analysis only: no classifier configured.
    Analysis { analysis: Box<MarketAnalysis> },
    /// The classifier said NEUTRAL; no risk parameters exist.
    Neutral { analysis: Box<MarketAnalysis> },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SymbolReport {
    pub symbol: String,
    #[serde(flatten)]
    pub outcome: SymbolOutcome,
}

impl SymbolReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, SymbolOutcome::Failed { .. })
    }
}

pub struct BatchAnalyzer {
    analyzer: MarketAnalyzer,
    source: Arc<dyn CandleSource>,
    classifier: Option<Arc<dyn SignalClassifier>>,
    cache: Option<SnapshotCache>,
    parallel: bool,
}

impl BatchAnalyzer {
    pub fn new(analyzer: MarketAnalyzer, source: Arc<dyn CandleSource>) -> Self {
        Self {
            analyzer,
            source,
            classifier: None,
            cache: None,
            parallel: true,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn SignalClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_cache(mut self, cache: SnapshotCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// CSV source over `data_dir`, plus a static classifier when a verdict
    /// file is configured.
    pub fn from_config(config: &BatchConfig) -> Result<Self, BatchError> {
        config.validate()?;
        let analyzer = config.build_analyzer()?;
        let mut batch = Self::new(analyzer, Arc::new(CsvCandleSource::new(&config.data_dir)))
            .with_parallelism(config.parallel);
        if let Some(path) = &config.verdicts {
            batch = batch.with_classifier(Arc::new(StaticClassifier::from_file(path)?));
        }
        if config.cache_snapshots {
            batch = batch.with_cache(SnapshotCache::new());
        }
        Ok(batch)
    }

    pub fn cache(&self) -> Option<&SnapshotCache> {
        self.cache.as_ref()
    }

    /// Analyse every symbol; reports come back in input order.
    pub fn run(&self, symbols: &[String]) -> Vec<SymbolReport> {
        tracing::info!(
            symbols = symbols.len(),
            source = self.source.name(),
            parallel = self.parallel,
            "batch analysis started"
        );

        let reports: Vec<SymbolReport> = if self.parallel {
            symbols.par_iter().map(|s| self.report(s)).collect()
        } else {
            symbols.iter().map(|s| self.report(s)).collect()
        };

        let failed = reports.iter().filter(|r| r.is_failure()).count();
        tracing::info!(
            succeeded = reports.len() - failed,
            failed,
            "batch analysis finished"
        );
        reports
    }

    fn report(&self, symbol: &str) -> SymbolReport {
        let outcome = match self.analyze_symbol(symbol) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(symbol, error = %e, "symbol failed");
                SymbolOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        SymbolReport {
            symbol: symbol.to_string(),
            outcome,
        }
    }

    pub fn analyze_symbol(&self, symbol: &str) -> Result<SymbolOutcome, BatchError> {
        let series = self.source.fetch(symbol)?;
        let analysis = match &self.cache {
            Some(cache) => {
                let snapshot = cache.get_or_compute(&series, &self.analyzer.config().periods);
                self.analyzer.analyze_with(&series, snapshot)?
            }
            None => self.analyzer.analyze(&series)?,
        };

        let Some(classifier) = &self.classifier else {
            return Ok(SymbolOutcome::Analysis {
                analysis: Box::new(analysis),
            });
        };

        let verdict = classifier.classify(symbol, &analysis)?;
        if verdict.direction == TradeDirection::Neutral {
            tracing::debug!(symbol, "neutral verdict, no signal");
            return Ok(SymbolOutcome::Neutral {
                analysis: Box::new(analysis),
            });
        }
        let signal = self
            .analyzer
            .signal_from_analysis(symbol, &series, analysis, &verdict)?;
        Ok(SymbolOutcome::Signal {
            signal: Box::new(signal),
        })
    }
}

/// Configured symbols, or every CSV in the data directory when none are set.
pub fn resolve_symbols(config: &BatchConfig) -> Result<Vec<String>, BatchError> {
    if !config.symbols.is_empty() {
        return Ok(config.symbols.clone());
    }
    Ok(CsvCandleSource::new(&config.data_dir).list_symbols()?)
}
