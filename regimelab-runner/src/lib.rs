//! RegimeLab Runner: candle sources, configuration and batch analysis.
//!
//! This crate builds on `regimelab-core` to provide:
//! - TOML configuration for the analyzer and batch runs
//! - CSV and synthetic candle sources
//! - A static, file-backed signal classifier
//! - A memo cache for indicator snapshots
//! - Parallel multi-symbol analysis with per-symbol failure reporting

pub mod batch;
pub mod cache;
pub mod candle_source;
pub mod classifier;
pub mod config;
pub mod synthetic;

pub use batch::{resolve_symbols, BatchAnalyzer, BatchError, SymbolOutcome, SymbolReport};
pub use cache::{CacheStats, SnapshotCache};
pub use candle_source::{parse_timestamp, read_candles, write_candles, CsvCandleSource};
pub use classifier::StaticClassifier;
pub use config::{load_analyzer, BatchConfig, ConfigError};
pub use synthetic::SyntheticCandleSource;
