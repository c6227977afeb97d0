//! Stop-loss, take-profit ladder and trailing stop.
//!
//! The stop distance is ATR scaled by a chain of regime factors:
//! volatility base × trend tightening × phase buffer. Take-profit rungs sit
//! at fixed multiples of that distance, stretched by trend strength.

use serde::{Deserialize, Serialize};

use crate::domain::{Bias, TradeDirection};
use crate::error::AnalyticsError;
use crate::indicators::IndicatorSnapshot;
use crate::regime::{MarketPhase, MarketRegime, VolatilityBand};

/// Rung distances as multiples of the stop distance.
pub const TAKE_PROFIT_RATIOS: [f64; 3] = [1.5, 3.0, 6.0];

/// Stop distance as a fraction of entry when ATR is degenerate.
const ATR_FALLBACK_FRACTION: f64 = 0.01;
/// An ATR below this fraction of entry is too small to move the price.
const MIN_ATR_FRACTION: f64 = 1e-9;

const TRAILING_ATR_MULTIPLE: f64 = 1.6;
const PANIC_TRAILING_FACTOR: f64 = 2.5;
const CRISIS_BUFFER: f64 = 1.4;
const CONTINUATION_EXPANSION: f64 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskParameters {
    pub stop_loss: f64,
    /// Ordered nearest to farthest from entry.
    pub take_profit: [f64; 3],
    pub trailing_stop_distance: f64,
    /// Distance to the second rung over the stop distance.
    pub risk_reward: f64,
    /// |entry - stop_loss|.
    pub stop_distance: f64,
    /// base × tightening × phase buffer.
    pub stop_multiplier: f64,
}

fn base_multiplier(band: VolatilityBand) -> f64 {
    match band {
        VolatilityBand::Low => 1.4,
        VolatilityBand::Medium => 2.0,
        VolatilityBand::High => 3.2,
        VolatilityBand::Panic => 4.5,
    }
}

/// Tighter stops in strong trends, wider in chop.
pub fn tightening_factor(adx: f64) -> f64 {
    if adx > 30.0 {
        0.85
    } else if adx > 20.0 {
        0.95
    } else {
        1.15
    }
}

pub fn phase_buffer(phase: MarketPhase, crisis_mode: bool) -> f64 {
    let buffer = if phase.is_reversal_zone() { 1.2 } else { 1.0 };
    if crisis_mode {
        buffer * CRISIS_BUFFER
    } else {
        buffer
    }
}

pub fn stop_multiplier(regime: &MarketRegime, adx: f64) -> f64 {
    base_multiplier(regime.volatility)
        * tightening_factor(adx)
        * phase_buffer(regime.phase, regime.crisis_mode)
}

/// Take-profit stretch: wider targets in strong or continuing trends.
pub fn expansion_factor(adx: f64, phase: MarketPhase) -> f64 {
    let base = if adx > 35.0 {
        1.6
    } else if adx > 20.0 {
        1.2
    } else {
        0.9
    };
    if phase.is_continuation() {
        base * CONTINUATION_EXPANSION
    } else {
        base
    }
}

pub fn compute_risk(
    entry_price: f64,
    direction: TradeDirection,
    regime: &MarketRegime,
    indicators: &IndicatorSnapshot,
) -> Result<RiskParameters, AnalyticsError> {
    let bias = direction.bias().ok_or_else(|| {
        AnalyticsError::InvalidInput("risk parameters are undefined for NEUTRAL".into())
    })?;
    if !(entry_price.is_finite() && entry_price > 0.0) {
        return Err(AnalyticsError::InvalidInput(format!(
            "entry price must be positive, got {entry_price}"
        )));
    }
    let atr = indicators.atr;
    if !(atr.is_finite() && atr >= 0.0) {
        return Err(AnalyticsError::InvalidInput(format!(
            "ATR must be a non-negative number, got {atr}"
        )));
    }

    let atr = if atr < entry_price * MIN_ATR_FRACTION {
        entry_price * ATR_FALLBACK_FRACTION
    } else {
        atr
    };
    let adx = indicators.adx;

    let multiplier = stop_multiplier(regime, adx);
    let stop_distance = atr * multiplier;

    // +1 moves toward profit, -1 toward loss.
    let side = match bias {
        Bias::Long => 1.0,
        Bias::Short => -1.0,
    };
    let stop_loss = entry_price - side * stop_distance;

    let expansion = expansion_factor(adx, regime.phase);
    let take_profit = TAKE_PROFIT_RATIOS.map(|r| entry_price + side * stop_distance * r * expansion);

    let trailing_factor = if regime.volatility == VolatilityBand::Panic {
        PANIC_TRAILING_FACTOR
    } else {
        1.0
    };
    let trailing_stop_distance = atr * TRAILING_ATR_MULTIPLE * trailing_factor;

    let risk_reward = (take_profit[1] - entry_price).abs() / stop_distance;

    tracing::debug!(
        ?direction,
        entry_price,
        stop_loss,
        multiplier,
        risk_reward,
        "risk parameters computed"
    );

    Ok(RiskParameters {
        stop_loss,
        take_profit,
        trailing_stop_distance,
        risk_reward,
        stop_distance,
        stop_multiplier: multiplier,
    })
}
