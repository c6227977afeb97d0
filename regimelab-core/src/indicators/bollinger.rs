//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//! - Width: (upper - lower) / middle
//!
//! Uses population stddev (divide by N). Insufficient data → all zero.

use serde::{Deserialize, Serialize};

use crate::series::{moving_average, std_dev};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub width: f64,
}

impl BollingerBands {
    /// Where `price` sits inside the band: 0 at the lower band, 1 at the
    /// upper. A zero-width band yields the midpoint 0.5.
    pub fn position(&self, price: f64) -> f64 {
        let span = self.upper - self.lower;
        if span <= 0.0 {
            return 0.5;
        }
        (price - self.lower) / span
    }
}

pub fn bollinger(closes: &[f64], period: usize, multiplier: f64) -> BollingerBands {
    if period == 0 || closes.len() < period {
        return BollingerBands::default();
    }
    let middle = moving_average(closes, period);
    let offset = multiplier * std_dev(closes, period);
    let upper = middle + offset;
    let lower = middle - offset;
    let width = if middle == 0.0 {
        0.0
    } else {
        (upper - lower) / middle
    };
    BollingerBands {
        upper,
        middle,
        lower,
        width,
    }
}
