//! Market regime classification.
//!
//! Turns one candle series (plus its indicator snapshot) into a discrete
//! regime: trend direction, volatility band, Wyckoff-style phase and a
//! crisis flag. Stateless; the regime is a value with no identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::CandleSeries;
use crate::error::AnalyticsError;
use crate::indicators::{compute_indicators, IndicatorSnapshot};
use crate::series::trend_slope;

/// Fewer candles than this and no regime is emitted.
pub const MIN_REGIME_CANDLES: usize = 50;

/// Window for the close-price regression slope.
pub const SLOPE_WINDOW: usize = 20;

/// ADX above this counts as a directional market.
pub const TREND_ADX_THRESHOLD: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityBand {
    Low,
    Medium,
    High,
    Panic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketPhase {
    Accumulation,
    Markup,
    Distribution,
    Markdown,
    Neutral,
}

impl MarketPhase {
    /// Accumulation and distribution sit at potential reversals.
    pub fn is_reversal_zone(self) -> bool {
        matches!(self, Self::Accumulation | Self::Distribution)
    }

    /// Markup and markdown are trend continuation phases.
    pub fn is_continuation(self) -> bool {
        matches!(self, Self::Markup | Self::Markdown)
    }
}

impl fmt::Display for MarketPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Accumulation => "accumulation",
            Self::Markup => "markup",
            Self::Distribution => "distribution",
            Self::Markdown => "markdown",
            Self::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketRegime {
    pub trend: Trend,
    /// ADX reading the trend was judged on.
    pub strength: f64,
    pub volatility: VolatilityBand,
    /// ATR as a percentage of the last close.
    pub volatility_value: f64,
    pub phase: MarketPhase,
    pub crisis_mode: bool,
}

pub fn trend_direction(adx: f64, slope: f64) -> Trend {
    if adx > TREND_ADX_THRESHOLD {
        if slope > 0.0 {
            Trend::Bullish
        } else {
            Trend::Bearish
        }
    } else {
        Trend::Neutral
    }
}

/// Bands on ATR% of price: <1.5 low, <3 medium, <5 high, otherwise panic.
pub fn volatility_band(volatility_pct: f64) -> VolatilityBand {
    if volatility_pct >= 5.0 {
        VolatilityBand::Panic
    } else if volatility_pct >= 3.0 {
        VolatilityBand::High
    } else if volatility_pct >= 1.5 {
        VolatilityBand::Medium
    } else {
        VolatilityBand::Low
    }
}

/// Wyckoff phase; rules are evaluated in order and the first match wins.
pub fn wyckoff_phase(rsi: f64, slope: f64) -> MarketPhase {
    if rsi < 35.0 && slope > -0.1 {
        MarketPhase::Accumulation
    } else if slope > 0.5 {
        MarketPhase::Markup
    } else if rsi > 65.0 && slope < 0.1 {
        MarketPhase::Distribution
    } else if slope < -0.5 {
        MarketPhase::Markdown
    } else {
        MarketPhase::Neutral
    }
}

impl MarketRegime {
    /// Assemble a regime from raw readings.
    pub fn from_readings(adx: f64, slope: f64, rsi: f64, atr: f64, last_close: f64) -> Self {
        let volatility_value = if last_close > 0.0 {
            atr / last_close * 100.0
        } else {
            0.0
        };
        let volatility = volatility_band(volatility_value);
        Self {
            trend: trend_direction(adx, slope),
            strength: adx,
            volatility,
            volatility_value,
            phase: wyckoff_phase(rsi, slope),
            crisis_mode: volatility == VolatilityBand::Panic,
        }
    }
}

/// Classify with an already computed snapshot for the same series.
pub fn classify_with(
    series: &CandleSeries,
    snapshot: &IndicatorSnapshot,
) -> Result<MarketRegime, AnalyticsError> {
    if series.len() < MIN_REGIME_CANDLES {
        tracing::debug!(
            candles = series.len(),
            required = MIN_REGIME_CANDLES,
            "not enough candles for a regime"
        );
        return Err(AnalyticsError::insufficient(
            "regime classification",
            MIN_REGIME_CANDLES,
            series.len(),
        ));
    }

    let slope = trend_slope(&series.closes(), SLOPE_WINDOW);
    let regime = MarketRegime::from_readings(
        snapshot.adx,
        slope,
        snapshot.rsi.value,
        snapshot.atr,
        series.last().close,
    );

    tracing::debug!(
        trend = ?regime.trend,
        phase = %regime.phase,
        volatility = ?regime.volatility,
        adx = regime.strength,
        slope,
        "regime classified"
    );
    Ok(regime)
}

/// Classify with the default indicator periods.
pub fn classify_regime(series: &CandleSeries) -> Result<MarketRegime, AnalyticsError> {
    classify_with(series, &compute_indicators(series))
}
