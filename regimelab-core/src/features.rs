//! Alpha features: comparative and derivative inputs for the classifier.
//!
//! Pure value type built from one candle series. None of these features
//! are signals on their own; they are handed to the external classifier and
//! to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::domain::CandleSeries;
use crate::error::AnalyticsError;
use crate::indicators::{bollinger, obv, rsi, support_resistance};
use crate::series::{moving_average, trend_slope};

/// Volume and support/resistance window; also the minimum series length.
pub const FEATURE_WINDOW: usize = 20;

/// Look-back distance for the price/RSI divergence comparison.
pub const DIVERGENCE_LOOKBACK: usize = 10;

/// Window for the price acceleration slope.
pub const ACCELERATION_WINDOW: usize = 10;

/// Floor on the candle range so a zero-range candle never divides by zero.
pub const RANGE_EPSILON: f64 = 1e-4;

const RSI_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Divergence {
    Bullish,
    Bearish,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObvTrend {
    Rising,
    Falling,
    Flat,
}

impl ObvTrend {
    fn from_slope(slope: f64) -> Self {
        if slope > 0.0 {
            Self::Rising
        } else if slope < 0.0 {
            Self::Falling
        } else {
            Self::Flat
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaFeatures {
    pub rsi_divergence: Divergence,
    /// Last volume over the mean volume of the last 20 candles.
    pub volume_ratio: f64,
    /// Close-price regression slope over the last 10 candles.
    pub price_acceleration: f64,
    pub obv_trend: ObvTrend,
    /// |close - open| / (high - low) of the last candle.
    pub candle_body_ratio: f64,
    pub dist_to_support: f64,
    pub dist_to_resistance: f64,
    /// Last close inside the 20-period Bollinger band (0 = lower, 1 = upper).
    pub bb_position: f64,
}

/// Price down while RSI up → bullish; price up while RSI down → bearish.
pub fn rsi_divergence(closes: &[f64]) -> Divergence {
    let n = closes.len();
    if n < DIVERGENCE_LOOKBACK {
        return Divergence::None;
    }
    let last_price = closes[n - 1];
    let prev_price = closes[n - DIVERGENCE_LOOKBACK];
    let last_rsi = rsi(closes, RSI_PERIOD);
    let prev_rsi = rsi(&closes[..n - DIVERGENCE_LOOKBACK], RSI_PERIOD);

    if last_price < prev_price && last_rsi > prev_rsi {
        Divergence::Bullish
    } else if last_price > prev_price && last_rsi < prev_rsi {
        Divergence::Bearish
    } else {
        Divergence::None
    }
}

pub fn extract_features(series: &CandleSeries) -> Result<AlphaFeatures, AnalyticsError> {
    if series.len() < FEATURE_WINDOW {
        return Err(AnalyticsError::insufficient(
            "feature extraction",
            FEATURE_WINDOW,
            series.len(),
        ));
    }

    let candles = series.candles();
    let closes = series.closes();
    let last = series.last();

    let mean_volume = moving_average(&series.volumes(), FEATURE_WINDOW);
    let volume_ratio = if mean_volume > 0.0 {
        last.volume / mean_volume
    } else {
        1.0
    };

    let obv_series = obv(candles);
    let obv_tail = &obv_series[obv_series.len() - FEATURE_WINDOW..];
    let obv_trend = ObvTrend::from_slope(trend_slope(obv_tail, FEATURE_WINDOW));

    let candle_body_ratio = last.body() / last.range().max(RANGE_EPSILON);

    let levels = support_resistance(candles, FEATURE_WINDOW).ok_or_else(|| {
        AnalyticsError::InvalidInput("support/resistance on an empty series".into())
    })?;

    let bb_position = bollinger(&closes, FEATURE_WINDOW, 2.0).position(last.close);

    Ok(AlphaFeatures {
        rsi_divergence: rsi_divergence(&closes),
        volume_ratio,
        price_acceleration: trend_slope(&closes, ACCELERATION_WINDOW),
        obv_trend,
        candle_body_ratio,
        dist_to_support: levels.dist_to_support,
        dist_to_resistance: levels.dist_to_resistance,
        bb_position,
    })
}
