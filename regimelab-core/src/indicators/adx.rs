//! ADX: directional index over a trailing window.
//!
//! Steps:
//! 1. +DM / -DM per step (a move counts only if it is positive and larger
//!    than the opposing move, otherwise 0)
//! 2. Average +DM and -DM over the last `period` steps
//! 3. +DI = 100 * avg(+DM) / ATR, -DI = 100 * avg(-DM) / ATR
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI)
//!
//! The reading is the latest DX, not a smoothed ADX line. Whenever the
//! result would be undefined or zero (fewer than 2*period candles, zero ATR,
//! zero DI sum) the neutral 20 is returned instead.

use crate::domain::Candle;
use crate::series::moving_average;

use super::atr::atr;
/// Reading returned for insufficient or degenerate input.
pub const NEUTRAL_ADX: f64 = 20.0;

/// Per-step (+DM, -DM) pairs, one per candle after the first.
pub fn directional_movement(candles: &[Candle]) -> (Vec<f64>, Vec<f64>) {
    candles
        .windows(2)
        .map(|w| {
            let up = w[1].high - w[0].high;
            let down = w[0].low - w[1].low;
            let plus = if up > down && up > 0.0 { up } else { 0.0 };
            let minus = if down > up && down > 0.0 { down } else { 0.0 };
            (plus, minus)
        })
        .unzip()
}

pub fn adx(candles: &[Candle], period: usize) -> f64 {
    if period == 0 || candles.len() < 2 * period {
        return NEUTRAL_ADX;
    }

    let range = atr(candles, period);
    if range <= 0.0 {
        return NEUTRAL_ADX;
    }

    let (plus_dm, minus_dm) = directional_movement(candles);
    let plus_di = moving_average(&plus_dm, period) / range * 100.0;
    let minus_di = moving_average(&minus_dm, period) / range * 100.0;

    let di_sum = plus_di + minus_di;
    if di_sum <= 0.0 {
        return NEUTRAL_ADX;
    }

    let dx = (plus_di - minus_di).abs() / di_sum * 100.0;
    if dx.is_finite() && dx > 0.0 {
        dx
    } else {
        NEUTRAL_ADX
    }
}
