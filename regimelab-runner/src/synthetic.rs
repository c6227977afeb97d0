//! Synthetic candles for testing and demos.
//!
//! A seeded random walk from 100.0. The seed is derived from the symbol with
//! BLAKE3 (optionally mixed with a user seed), so the same symbol always
//! yields the same candles.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regimelab_core::{Candle, CandleSeries, CandleSource, SourceError};

/// One hour.
pub const DEFAULT_INTERVAL_MS: i64 = 3_600_000;

#[derive(Debug, Clone)]
pub struct SyntheticCandleSource {
    bars: usize,
    interval_ms: i64,
    start_ms: i64,
    seed: Option<u64>,
}

impl SyntheticCandleSource {
    pub fn new(bars: usize) -> Self {
        Self {
            bars,
            interval_ms: DEFAULT_INTERVAL_MS,
            start_ms: 1_704_067_200_000, // 2024-01-01T00:00:00Z
            seed: None,
        }
    }

    pub fn with_interval(mut self, interval_ms: i64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    pub fn with_start(mut self, start_ms: i64) -> Self {
        self.start_ms = start_ms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng_for(&self, symbol: &str) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(symbol.as_bytes());
        if let Some(seed) = self.seed {
            hasher.update(&seed.to_le_bytes());
        }
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }

    pub fn generate(&self, symbol: &str) -> Vec<Candle> {
        let mut rng = self.rng_for(symbol);
        let mut price = 100.0_f64;

        (0..self.bars)
            .map(|i| {
                let step: f64 = rng.gen_range(-0.03..0.03);
                let open = price;
                let close = price * (1.0 + step);
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
                let volume = rng.gen_range(500.0..5_000.0);
                price = close;
                Candle::new(
                    self.start_ms + i as i64 * self.interval_ms,
                    open,
                    high,
                    low,
                    close,
                    volume,
                )
            })
            .collect()
    }
}

impl CandleSource for SyntheticCandleSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str) -> Result<CandleSeries, SourceError> {
        if self.interval_ms <= 0 {
            return Err(SourceError::Malformed {
                symbol: symbol.to_string(),
                message: format!("interval must be positive, got {}", self.interval_ms),
            });
        }
        Ok(CandleSeries::new(self.generate(symbol))?)
    }
}
