//! Candle-aware indicators.
//!
//! Every indicator reads the trailing end of a candle slice and returns the
//! latest reading. Short inputs never error: each indicator has a fixed
//! neutral fallback (RSI 50, ADX 20, ATR/EMA 0) and the regime thresholds
//! downstream are calibrated against exactly those values.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod levels;
pub mod obv;
pub mod rsi;
pub mod snapshot;

pub use adx::{adx, NEUTRAL_ADX};
pub use atr::{atr, true_ranges};
pub use bollinger::{bollinger, BollingerBands};
pub use levels::{support_resistance, SupportResistance};
pub use obv::obv;
pub use rsi::{rsi, NEUTRAL_RSI};
pub use snapshot::{compute_indicators, EmaPair, IndicatorPeriods, IndicatorSnapshot, RsiReading};

#[cfg(test)]
use crate::domain::Candle;

/// Create synthetic candles from close prices for testing.
///
/// open = prev_close (or close for the first candle),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000,
/// one-hour spacing.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
                timestamp: i as i64 * 3_600_000,
            }
        })
        .collect()
}

/// Build candles from explicit (open, high, low, close) tuples.
#[cfg(test)]
pub fn make_ohlc_candles(data: &[(f64, f64, f64, f64)]) -> Vec<Candle> {
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Candle {
            open,
            high,
            low,
            close,
            volume: 1000.0,
            timestamp: i as i64 * 3_600_000,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
