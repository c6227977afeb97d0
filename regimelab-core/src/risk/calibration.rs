//! Confidence calibration and position sizing.
//!
//! Confidence is a `[0, 1]` fraction everywhere in this crate;
//! `CalibratedConfidence::percent` is the one place it becomes a percentage.

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::regime::{MarketRegime, VolatilityBand};

const MODEL_WEIGHT: f64 = 0.65;
const ON_CHAIN_WEIGHT: f64 = 0.35;

const KELLY_FLOOR: f64 = 0.01;
const KELLY_CAP: f64 = 0.25;

/// Smallest position size, in percent of equity.
pub const MIN_POSITION_PCT: f64 = KELLY_FLOOR * 100.0;
/// Largest position size, in percent of equity.
pub const MAX_POSITION_PCT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibratedConfidence {
    /// Blended confidence in `[0, 1]`.
    pub confidence: f64,
    /// Position size in percent of equity, `[1, 10]`.
    pub position_size_pct: f64,
    /// Kelly fraction after clamping to `[0.01, 0.25]`.
    pub kelly_fraction: f64,
}

impl CalibratedConfidence {
    pub fn percent(&self) -> f64 {
        self.confidence * 100.0
    }
}

fn unit_interval(name: &str, value: f64) -> Result<f64, AnalyticsError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(AnalyticsError::InvalidInput(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

pub fn calibrate_confidence(
    model_confidence: f64,
    on_chain_score: f64,
    kelly_fraction: f64,
) -> Result<CalibratedConfidence, AnalyticsError> {
    let model = unit_interval("model confidence", model_confidence)?;
    let on_chain = unit_interval("on-chain score", on_chain_score)?;
    let kelly = unit_interval("kelly fraction", kelly_fraction)?.clamp(KELLY_FLOOR, KELLY_CAP);

    Ok(CalibratedConfidence {
        confidence: model * MODEL_WEIGHT + on_chain * ON_CHAIN_WEIGHT,
        position_size_pct: (kelly * 100.0).min(MAX_POSITION_PCT),
        kelly_fraction: kelly,
    })
}

/// Expected return per unit risked: `rr·c − (1 − c)`.
pub fn expected_value(risk_reward: f64, confidence: f64) -> f64 {
    risk_reward * confidence - (1.0 - confidence)
}

/// Kelly fraction from a confidence and a win/loss payoff ratio.
///
/// Confidence is shrunk halfway toward a coin flip before it is used as the
/// win probability. The result is clamped to `[0.01, 0.25]`.
pub fn estimate_kelly(confidence: f64, win_loss_ratio: f64) -> Result<f64, AnalyticsError> {
    let confidence = unit_interval("confidence", confidence)?;
    if !(win_loss_ratio.is_finite() && win_loss_ratio > 0.0) {
        return Err(AnalyticsError::InvalidInput(format!(
            "win/loss ratio must be positive, got {win_loss_ratio}"
        )));
    }
    let p = 0.5 + (confidence - 0.5) * 0.5;
    let kelly = p - (1.0 - p) / win_loss_ratio;
    Ok(kelly.clamp(KELLY_FLOOR, KELLY_CAP))
}

/// Position scale for the regime's volatility: 0.9 in a medium band, 0.7 in
/// a high band, halved again once the regime is in crisis.
pub fn volatility_size_multiplier(regime: &MarketRegime) -> f64 {
    let base = match regime.volatility {
        VolatilityBand::Low => 1.0,
        VolatilityBand::Medium => 0.9,
        VolatilityBand::High | VolatilityBand::Panic => 0.7,
    };
    if regime.crisis_mode {
        base * 0.5
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regime::{MarketPhase, Trend};

    fn regime(volatility: VolatilityBand, crisis_mode: bool) -> MarketRegime {
        MarketRegime {
            trend: Trend::Neutral,
            strength: 20.0,
            volatility,
            volatility_value: 1.0,
            phase: MarketPhase::Neutral,
            crisis_mode,
        }
    }

    #[test]
    fn blend_weights() {
        let c = calibrate_confidence(0.8, 0.4, 0.1).unwrap();
        assert!((c.confidence - (0.52 + 0.14)).abs() < 1e-12);
        assert!((c.percent() - 66.0).abs() < 1e-9);
        assert!((c.position_size_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn position_size_bounds() {
        let tiny = calibrate_confidence(0.5, 0.5, 0.0).unwrap();
        assert!((tiny.position_size_pct - 1.0).abs() < 1e-12);
        assert_eq!(tiny.kelly_fraction, 0.01);

        let mid = calibrate_confidence(0.5, 0.5, 0.05).unwrap();
        assert!((mid.position_size_pct - 5.0).abs() < 1e-12);

        let huge = calibrate_confidence(0.5, 0.5, 1.0).unwrap();
        assert_eq!(huge.position_size_pct, MAX_POSITION_PCT);
        assert_eq!(huge.kelly_fraction, 0.25);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(calibrate_confidence(1.2, 0.5, 0.1).is_err());
        assert!(calibrate_confidence(0.5, -0.1, 0.1).is_err());
        assert!(calibrate_confidence(0.5, 0.5, f64::NAN).is_err());
        // 0..100 percentages are a unit mistake, not a confidence.
        assert!(calibrate_confidence(72.0, 0.5, 0.1).is_err());
    }

    #[test]
    fn expected_value_formula() {
        assert!((expected_value(3.0, 0.5) - 1.0).abs() < 1e-12);
        assert!((expected_value(1.0, 0.25) + 0.5).abs() < 1e-12);
        assert!((expected_value(2.0, 0.0) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn kelly_estimate() {
        // c = 0.8 → p = 0.65; ratio 2 → 0.65 - 0.175 = 0.475 → capped
        assert_eq!(estimate_kelly(0.8, 2.0).unwrap(), 0.25);
        // c = 0.6 → p = 0.55; ratio 1.5 → 0.55 - 0.3 = 0.25
        assert!((estimate_kelly(0.6, 1.5).unwrap() - 0.25).abs() < 1e-12);
        // c = 0.5 → p = 0.5; ratio 1.25 → 0.5 - 0.4 = 0.1
        assert!((estimate_kelly(0.5, 1.25).unwrap() - 0.1).abs() < 1e-12);
        // coin flip at even odds has no edge → floor
        assert_eq!(estimate_kelly(0.5, 1.0).unwrap(), 0.01);
    }

    #[test]
    fn kelly_rejects_bad_ratio() {
        assert!(estimate_kelly(0.6, 0.0).is_err());
        assert!(estimate_kelly(0.6, f64::INFINITY).is_err());
    }

    #[test]
    fn volatility_scales_size_down() {
        assert_eq!(volatility_size_multiplier(&regime(VolatilityBand::Low, false)), 1.0);
        assert_eq!(volatility_size_multiplier(&regime(VolatilityBand::Medium, false)), 0.9);
        assert_eq!(volatility_size_multiplier(&regime(VolatilityBand::High, false)), 0.7);
        assert!((volatility_size_multiplier(&regime(VolatilityBand::Panic, true)) - 0.35).abs() < 1e-12);
    }
}
