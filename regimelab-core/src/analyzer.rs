//! Market analyzer: one stateless service that runs the whole pipeline.
//!
//! candles → snapshot → (regime, features) → risk → calibrated signal.
//! Each stage is also available as a free function; the analyzer only adds
//! configured periods, the signal validity window and the trade journal
//! that feeds Kelly estimates.

use serde::{Deserialize, Serialize};

use crate::collaborators::ClassifierVerdict;
use crate::domain::{CandleSeries, Symbol, TradeDirection};
use crate::error::AnalyticsError;
use crate::features::{extract_features, AlphaFeatures};
use crate::indicators::{IndicatorPeriods, IndicatorSnapshot};
use crate::regime::{classify_with, MarketRegime};
use crate::risk::{
    calibrate_confidence, compute_risk, estimate_kelly, expected_value,
    volatility_size_multiplier, CalibratedConfidence, RiskParameters, TradeJournal,
};

/// Two hours.
pub const DEFAULT_SIGNAL_VALIDITY_MS: i64 = 2 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub periods: IndicatorPeriods,
    /// How long a signal stays actionable after its last candle.
    pub signal_validity_ms: i64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            periods: IndicatorPeriods::default(),
            signal_validity_ms: DEFAULT_SIGNAL_VALIDITY_MS,
        }
    }
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        self.periods.validate()?;
        if self.signal_validity_ms <= 0 {
            return Err(AnalyticsError::InvalidInput(format!(
                "signal_validity_ms must be positive, got {}",
                self.signal_validity_ms
            )));
        }
        Ok(())
    }
}

/// Everything derived from candles alone, before any directional decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub snapshot: IndicatorSnapshot,
    pub regime: MarketRegime,
    pub features: AlphaFeatures,
}

impl MarketAnalysis {
    pub fn last_close_time(&self) -> i64 {
        self.snapshot.timestamp
    }
}

/// Final payload for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub symbol: Symbol,
    pub direction: TradeDirection,
    /// Blended confidence in `[0, 1]`.
    pub confidence: f64,
    pub on_chain_score: f64,
    pub entry_price: f64,
    pub risk: RiskParameters,
    pub position_size_pct: f64,
    /// `position_size_pct` scaled down for the regime's volatility.
    pub adjusted_position_pct: f64,
    pub expected_value: f64,
    /// Clamped Kelly fraction actually used for sizing.
    pub kelly_fraction: f64,
    /// Payoff ratio behind an estimated Kelly fraction; `None` when the
    /// verdict supplied its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_loss_ratio: Option<f64>,
    pub regime: MarketRegime,
    pub indicators: IndicatorSnapshot,
    pub features: AlphaFeatures,
    /// Unix millis after which the signal should be discarded.
    pub valid_until: i64,
}

impl TradeSignal {
    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        now_ms <= self.valid_until
    }
}

#[derive(Debug, Clone, Default)]
pub struct MarketAnalyzer {
    config: AnalyzerConfig,
    journal: TradeJournal,
}

impl MarketAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyticsError> {
        config.validate()?;
        Ok(Self {
            config,
            journal: TradeJournal::new(),
        })
    }

    /// Realised outcomes used when a verdict carries no Kelly fraction.
    pub fn with_journal(mut self, journal: TradeJournal) -> Self {
        self.journal = journal;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn journal(&self) -> &TradeJournal {
        &self.journal
    }

    pub fn compute_indicators(&self, series: &CandleSeries) -> IndicatorSnapshot {
        IndicatorSnapshot::compute(series, &self.config.periods)
    }

    pub fn classify_regime(&self, series: &CandleSeries) -> Result<MarketRegime, AnalyticsError> {
        classify_with(series, &self.compute_indicators(series))
    }

    pub fn extract_features(&self, series: &CandleSeries) -> Result<AlphaFeatures, AnalyticsError> {
        extract_features(series)
    }

    pub fn compute_risk(
        &self,
        entry_price: f64,
        direction: TradeDirection,
        regime: &MarketRegime,
        indicators: &IndicatorSnapshot,
    ) -> Result<RiskParameters, AnalyticsError> {
        compute_risk(entry_price, direction, regime, indicators)
    }

    pub fn calibrate_confidence(
        &self,
        model_confidence: f64,
        on_chain_score: f64,
        kelly_fraction: f64,
    ) -> Result<CalibratedConfidence, AnalyticsError> {
        calibrate_confidence(model_confidence, on_chain_score, kelly_fraction)
    }

    /// Snapshot, regime and features in one pass over the series.
    pub fn analyze(&self, series: &CandleSeries) -> Result<MarketAnalysis, AnalyticsError> {
        let snapshot = self.compute_indicators(series);
        self.analyze_with(series, snapshot)
    }

    /// Same as [`analyze`](Self::analyze) with a snapshot computed elsewhere
    /// (for example a memo cache) for this series and these periods.
    pub fn analyze_with(
        &self,
        series: &CandleSeries,
        snapshot: IndicatorSnapshot,
    ) -> Result<MarketAnalysis, AnalyticsError> {
        let regime = classify_with(series, &snapshot)?;
        let features = extract_features(series)?;
        Ok(MarketAnalysis {
            snapshot,
            regime,
            features,
        })
    }

    pub fn build_signal(
        &self,
        symbol: &str,
        series: &CandleSeries,
        verdict: &ClassifierVerdict,
    ) -> Result<TradeSignal, AnalyticsError> {
        let analysis = self.analyze(series)?;
        self.signal_from_analysis(symbol, series, analysis, verdict)
    }

    /// Assemble a signal from an existing analysis of `series`.
    pub fn signal_from_analysis(
        &self,
        symbol: &str,
        series: &CandleSeries,
        analysis: MarketAnalysis,
        verdict: &ClassifierVerdict,
    ) -> Result<TradeSignal, AnalyticsError> {
        verdict.validate()?;
        if verdict.direction == TradeDirection::Neutral {
            return Err(AnalyticsError::InvalidInput(format!(
                "{symbol}: classifier returned NEUTRAL, no signal to build"
            )));
        }

        let entry_price = series.last().close;
        let risk = compute_risk(
            entry_price,
            verdict.direction,
            &analysis.regime,
            &analysis.snapshot,
        )?;
        let (kelly_fraction, win_loss_ratio) = match verdict.kelly_fraction {
            Some(kelly) => (kelly, None),
            None => {
                let ratio = self.journal.win_loss_ratio();
                (estimate_kelly(verdict.confidence, ratio)?, Some(ratio))
            }
        };
        let calibrated =
            calibrate_confidence(verdict.confidence, verdict.on_chain_score, kelly_fraction)?;
        let valid_until = series
            .last()
            .timestamp
            .checked_add(self.config.signal_validity_ms)
            .ok_or_else(|| {
                AnalyticsError::InvalidInput(format!(
                    "{symbol}: signal validity of {} ms overflows the last timestamp",
                    self.config.signal_validity_ms
                ))
            })?;

        let signal = TradeSignal {
            symbol: symbol.to_string(),
            direction: verdict.direction,
            confidence: calibrated.confidence,
            on_chain_score: verdict.on_chain_score,
            entry_price,
            expected_value: expected_value(risk.risk_reward, calibrated.confidence),
            risk,
            position_size_pct: calibrated.position_size_pct,
            adjusted_position_pct: calibrated.position_size_pct
                * volatility_size_multiplier(&analysis.regime),
            kelly_fraction: calibrated.kelly_fraction,
            win_loss_ratio,
            regime: analysis.regime,
            indicators: analysis.snapshot,
            features: analysis.features,
            valid_until,
        };

        tracing::info!(
            symbol,
            direction = %signal.direction,
            confidence = signal.confidence,
            entry = entry_price,
            stop = signal.risk.stop_loss,
            "signal built"
        );
        Ok(signal)
    }
}
