//! Support / resistance band over a trailing window.
//!
//! resistance = max(high), support = min(low) over the last `window`
//! candles (the whole slice if shorter). Distances are fractions of the
//! last close.

use serde::{Deserialize, Serialize};

use crate::domain::Candle;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    pub support: f64,
    pub resistance: f64,
    /// (last_close - support) / last_close
    pub dist_to_support: f64,
    /// (resistance - last_close) / last_close
    pub dist_to_resistance: f64,
}

/// Returns `None` only for an empty slice.
pub fn support_resistance(candles: &[Candle], window: usize) -> Option<SupportResistance> {
    let last = candles.last()?;
    let start = candles.len().saturating_sub(window.max(1));
    let tail = &candles[start..];

    let resistance = tail.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let support = tail.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    let price = last.close;

    Some(SupportResistance {
        support,
        resistance,
        dist_to_support: (price - support) / price,
        dist_to_resistance: (resistance - price) / price,
    })
}
