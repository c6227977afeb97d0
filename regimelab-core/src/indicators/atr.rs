//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|), defined
//! from the second candle on (the first has no previous close).
//! ATR = simple moving average of the last `period` true ranges.
//! Fewer than period+1 candles → 0.

use crate::domain::Candle;
use crate::series::moving_average;

/// True range series, one entry per candle after the first.
pub fn true_ranges(candles: &[Candle]) -> Vec<f64> {
    candles
        .windows(2)
        .map(|w| w[1].true_range(w[0].close))
        .collect()
}

pub fn atr(candles: &[Candle], period: usize) -> f64 {
    if period == 0 || candles.len() <= period {
        return 0.0;
    }
    moving_average(&true_ranges(candles), period)
}
