//! RegimeLab Core: indicators, regime classification, features and risk.
//!
//! Pure, deterministic computation over candle series:
//! - Domain types (candles, validated series, trade direction)
//! - Series math and candle indicators (RSI, ATR, ADX, OBV, EMA, Bollinger)
//! - Market regime: trend, volatility band, Wyckoff phase, crisis flag
//! - Alpha features for an external classifier
//! - Risk parameters, confidence calibration and Kelly sizing
//! - `MarketAnalyzer`, which assembles all of the above into a trade signal
//! - Collaborator traits for candle sources and signal classifiers

pub mod analyzer;
pub mod collaborators;
pub mod domain;
pub mod error;
pub mod features;
pub mod fingerprint;
pub mod indicators;
pub mod regime;
pub mod risk;
pub mod series;

pub use analyzer::{AnalyzerConfig, MarketAnalysis, MarketAnalyzer, TradeSignal};
pub use collaborators::{CandleSource, ClassifierVerdict, SignalClassifier, SourceError};
pub use domain::{Bias, Candle, CandleSeries, Symbol, TradeDirection};
pub use error::{AnalyticsError, AnalyticsResult};
pub use features::{extract_features, AlphaFeatures};
pub use fingerprint::{SeriesFingerprint, SnapshotKey};
pub use indicators::{compute_indicators, IndicatorPeriods, IndicatorSnapshot};
pub use regime::{classify_regime, MarketPhase, MarketRegime, Trend, VolatilityBand};
pub use risk::{calibrate_confidence, compute_risk, CalibratedConfidence, RiskParameters};
