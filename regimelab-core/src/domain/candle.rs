//! Candle: the fundamental market data unit.

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// OHLCV candle for a single symbol over one interval.
///
/// `timestamp` is the interval open time in Unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: i64,
}

impl Candle {
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }

    /// High minus low.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Absolute distance between open and close.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// True range against the previous close.
    pub fn true_range(&self, prev_close: f64) -> f64 {
        self.range()
            .max((self.high - prev_close).abs())
            .max((self.low - prev_close).abs())
    }

    fn check(&self, index: usize) -> Result<(), AnalyticsError> {
        let fields = [self.open, self.high, self.low, self.close, self.volume];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(AnalyticsError::InvalidInput(format!(
                "candle {index} has a non-finite field"
            )));
        }
        if self.high < self.low {
            return Err(AnalyticsError::InvalidInput(format!(
                "candle {index}: high {} is below low {}",
                self.high, self.low
            )));
        }
        let in_range = |price: f64| self.low <= price && price <= self.high;
        if !(in_range(self.open) && in_range(self.close)) {
            return Err(AnalyticsError::InvalidInput(format!(
                "candle {index}: open {} or close {} outside [{}, {}]",
                self.open, self.close, self.low, self.high
            )));
        }
        if self.open <= 0.0 || self.close <= 0.0 || self.low <= 0.0 {
            return Err(AnalyticsError::InvalidInput(format!(
                "candle {index} has a non-positive price"
            )));
        }
        if self.volume < 0.0 {
            return Err(AnalyticsError::InvalidInput(format!(
                "candle {index} has negative volume {}",
                self.volume
            )));
        }
        Ok(())
    }
}

/// Time-ascending sequence of candles.
///
/// Construction is the only validation point: once a `CandleSeries` exists,
/// timestamps are strictly increasing and every candle is sane, so indicator
/// code never re-checks ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(candles: Vec<Candle>) -> Result<Self, AnalyticsError> {
        if candles.is_empty() {
            return Err(AnalyticsError::InvalidInput(
                "candle series is empty".into(),
            ));
        }
        for (i, candle) in candles.iter().enumerate() {
            candle.check(i)?;
            if i > 0 && candle.timestamp <= candles[i - 1].timestamp {
                return Err(AnalyticsError::InvalidInput(format!(
                    "timestamps must strictly increase: candle {i} at {} follows {}",
                    candle.timestamp,
                    candles[i - 1].timestamp
                )));
            }
        }
        Ok(Self { candles })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Most recent candle. A series is never empty.
    pub fn last(&self) -> &Candle {
        &self.candles[self.candles.len() - 1]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }

    /// Drop the newest `n` candles. Returns `None` if nothing would remain.
    pub fn truncated(&self, n: usize) -> Option<CandleSeries> {
        if n >= self.candles.len() {
            return None;
        }
        Some(Self {
            candles: self.candles[..self.candles.len() - n].to_vec(),
        })
    }
}

impl<'de> Deserialize<'de> for CandleSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            candles: Vec<Candle>,
        }
        let raw = Raw::deserialize(deserializer)?;
        CandleSeries::new(raw.candles).map_err(serde::de::Error::custom)
    }
}

impl AsRef<[Candle]> for CandleSeries {
    fn as_ref(&self) -> &[Candle] {
        &self.candles
    }
}
