//! Indicator snapshot: every indicator reading for one point in time.
//!
//! Recomputed on demand from a `CandleSeries`, never mutated in place.
//! The timestamp is taken from the last candle, not the wall clock, so two
//! computations over the same series are bit-identical.

use serde::{Deserialize, Serialize};

use crate::domain::CandleSeries;
use crate::error::AnalyticsError;
use crate::series::exponential_average;

use super::{adx, atr, bollinger, obv, rsi, BollingerBands};

/// Lookback periods for the snapshot indicators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorPeriods {
    pub rsi: usize,
    pub atr: usize,
    pub adx: usize,
    pub ema_short: usize,
    pub ema_long: usize,
    pub bollinger: usize,
    pub bollinger_multiplier: f64,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        Self {
            rsi: 14,
            atr: 14,
            adx: 14,
            ema_short: 12,
            ema_long: 26,
            bollinger: 20,
            bollinger_multiplier: 2.0,
        }
    }
}

impl IndicatorPeriods {
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        let named = [
            ("rsi", self.rsi),
            ("atr", self.atr),
            ("adx", self.adx),
            ("ema_short", self.ema_short),
            ("ema_long", self.ema_long),
            ("bollinger", self.bollinger),
        ];
        if let Some((name, _)) = named.iter().find(|(_, p)| *p == 0) {
            return Err(AnalyticsError::InvalidInput(format!(
                "indicator period '{name}' must be >= 1"
            )));
        }
        if self.ema_short >= self.ema_long {
            return Err(AnalyticsError::InvalidInput(format!(
                "ema_short ({}) must be below ema_long ({})",
                self.ema_short, self.ema_long
            )));
        }
        if !(self.bollinger_multiplier.is_finite() && self.bollinger_multiplier > 0.0) {
            return Err(AnalyticsError::InvalidInput(
                "bollinger_multiplier must be a positive number".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiReading {
    pub value: f64,
    pub period: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmaPair {
    pub short: f64,
    pub long: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: RsiReading,
    pub atr: f64,
    pub adx: f64,
    pub ema: EmaPair,
    /// EMA(short) - EMA(long).
    pub macd_diff: f64,
    /// Last value of the OBV series.
    pub obv: f64,
    pub bollinger: BollingerBands,
    /// Timestamp of the last candle (Unix millis).
    pub timestamp: i64,
}

impl IndicatorSnapshot {
    pub fn compute(series: &CandleSeries, periods: &IndicatorPeriods) -> Self {
        let candles = series.candles();
        let closes = series.closes();

        let ema_short = exponential_average(&closes, periods.ema_short);
        let ema_long = exponential_average(&closes, periods.ema_long);

        Self {
            rsi: RsiReading {
                value: rsi(&closes, periods.rsi),
                period: periods.rsi,
            },
            atr: atr(candles, periods.atr),
            adx: adx(candles, periods.adx),
            ema: EmaPair {
                short: ema_short,
                long: ema_long,
            },
            macd_diff: ema_short - ema_long,
            obv: obv(candles).last().copied().unwrap_or(0.0),
            bollinger: bollinger(&closes, periods.bollinger, periods.bollinger_multiplier),
            timestamp: series.last().timestamp,
        }
    }
}

/// Snapshot with the default periods (RSI/ATR/ADX 14, EMA 12/26, BB 20x2).
pub fn compute_indicators(series: &CandleSeries) -> IndicatorSnapshot {
    IndicatorSnapshot::compute(series, &IndicatorPeriods::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, DEFAULT_EPSILON, NEUTRAL_ADX, NEUTRAL_RSI};

    fn series(closes: &[f64]) -> CandleSeries {
        CandleSeries::new(make_candles(closes)).unwrap()
    }

    #[test]
    fn snapshot_is_deterministic() {
        let closes: Vec<f64> = (0..80).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let s = series(&closes);
        assert_eq!(compute_indicators(&s), compute_indicators(&s));
    }

    #[test]
    fn short_series_uses_neutral_defaults() {
        let s = series(&[100.0, 101.0, 102.0]);
        let snap = compute_indicators(&s);
        assert_eq!(snap.rsi.value, NEUTRAL_RSI);
        assert_eq!(snap.rsi.period, 14);
        assert_eq!(snap.adx, NEUTRAL_ADX);
        assert_eq!(snap.atr, 0.0);
        assert_eq!(snap.ema.short, 0.0);
        assert_eq!(snap.ema.long, 0.0);
        assert_eq!(snap.macd_diff, 0.0);
    }

    #[test]
    fn snapshot_timestamp_is_last_candle() {
        let s = series(&[100.0; 30]);
        assert_eq!(compute_indicators(&s).timestamp, 29 * 3_600_000);
    }

    #[test]
    fn macd_is_ema_difference() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let snap = compute_indicators(&series(&closes));
        assert_approx(snap.macd_diff, snap.ema.short - snap.ema.long, DEFAULT_EPSILON);
        // Rising series: the faster average sits above the slower one.
        assert!(snap.macd_diff > 0.0);
    }

    #[test]
    fn obv_is_last_cumulative_value() {
        // Each rising close adds the 1000 volume from make_candles.
        let snap = compute_indicators(&series(&[1.0, 2.0, 3.0, 2.0]));
        assert_eq!(snap.obv, 1000.0);
    }

    #[test]
    fn custom_periods_are_reported() {
        let periods = IndicatorPeriods {
            rsi: 7,
            ..IndicatorPeriods::default()
        };
        let snap = IndicatorSnapshot::compute(&series(&[100.0; 10]), &periods);
        assert_eq!(snap.rsi.period, 7);
        assert_eq!(snap.rsi.value, 100.0);
    }

    #[test]
    fn period_validation() {
        assert!(IndicatorPeriods::default().validate().is_ok());
        let zero = IndicatorPeriods {
            atr: 0,
            ..IndicatorPeriods::default()
        };
        assert!(zero.validate().is_err());
        let inverted = IndicatorPeriods {
            ema_short: 30,
            ..IndicatorPeriods::default()
        };
        assert!(inverted.validate().is_err());
    }
}
