//! On-Balance Volume (OBV).
//!
//! Running sum starting at 0: add the candle's volume when the close rises,
//! subtract it when the close falls, carry forward on a tie.
//! Output has the same length as the input.

use crate::domain::Candle;

pub fn obv(candles: &[Candle]) -> Vec<f64> {
    let mut out = Vec::with_capacity(candles.len());
    if candles.is_empty() {
        return out;
    }
    out.push(0.0);
    for w in candles.windows(2) {
        let prev = out[out.len() - 1];
        let next = if w[1].close > w[0].close {
            prev + w[1].volume
        } else if w[1].close < w[0].close {
            prev - w[1].volume
        } else {
            prev
        };
        out.push(next);
    }
    out
}
