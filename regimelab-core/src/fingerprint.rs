//! Series fingerprinting: stable identity for memoising derived values.
//!
//! A `SeriesFingerprint` is a BLAKE3 hash over the canonical little-endian
//! bytes of every candle. Two series fingerprint equal iff they hold the same
//! candles bit-for-bit, so a snapshot keyed by (fingerprint, periods) can be
//! reused without recomputation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Candle, CandleSeries};
use crate::indicators::IndicatorPeriods;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesFingerprint([u8; 32]);

impl SeriesFingerprint {
    pub fn of(series: &CandleSeries) -> Self {
        Self::of_candles(series.candles())
    }

    pub fn of_candles(candles: &[Candle]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(candles.len() as u64).to_le_bytes());
        for c in candles {
            hasher.update(&c.timestamp.to_le_bytes());
            for v in [c.open, c.high, c.low, c.close, c.volume] {
                hasher.update(&v.to_bits().to_le_bytes());
            }
        }
        Self(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }

    /// First 16 hex characters, for log lines.
    pub fn short(&self) -> String {
        self.to_hex()[..16].to_string()
    }
}

impl fmt::Display for SeriesFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Memo key for a snapshot: which candles, under which periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    pub series: SeriesFingerprint,
    periods: [u64; 7],
}

impl SnapshotKey {
    pub fn new(series: SeriesFingerprint, periods: &IndicatorPeriods) -> Self {
        Self {
            series,
            periods: [
                periods.rsi as u64,
                periods.atr as u64,
                periods.adx as u64,
                periods.ema_short as u64,
                periods.ema_long as u64,
                periods.bollinger as u64,
                periods.bollinger_multiplier.to_bits(),
            ],
        }
    }
}
