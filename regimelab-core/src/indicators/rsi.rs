//! Relative Strength Index (RSI).
//!
//! Window-summed, not Wilder-smoothed: gains and losses are summed over the
//! last `period` close-to-close deltas.
//! RSI = 100 - 100 / (1 + gains / losses)
//! Edge cases: fewer than period+1 closes → 50; losses == 0 → 100
//! (this includes a perfectly flat window).

/// Reading returned when there are not enough closes.
pub const NEUTRAL_RSI: f64 = 50.0;

pub fn rsi(closes: &[f64], period: usize) -> f64 {
    let n = closes.len();
    if period == 0 || n <= period {
        return NEUTRAL_RSI;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in (n - period)..n {
        let diff = closes[i] - closes[i - 1];
        if diff >= 0.0 {
            gains += diff;
        } else {
            losses -= diff;
        }
    }

    if losses == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + gains / losses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn rsi_all_gains() {
        let closes = [100.0, 101.0, 102.0, 103.0, 104.0, 105.0];
        assert_approx(rsi(&closes, 3), 100.0, 1e-12);
    }

    #[test]
    fn rsi_all_losses() {
        let closes = [105.0, 104.0, 103.0, 102.0, 101.0, 100.0];
        assert_approx(rsi(&closes, 3), 0.0, 1e-12);
    }

    #[test]
    fn rsi_mixed_window() {
        // Last 3 deltas of [44, 44.34, 44.09, 43.61, 44.33]:
        // -0.25, -0.48, +0.72 → gains 0.72, losses 0.73
        // RSI = 100 - 100 / (1 + 0.72/0.73)
        let closes = [44.0, 44.34, 44.09, 43.61, 44.33];
        let expected = 100.0 - 100.0 / (1.0 + 0.72 / 0.73);
        assert_approx(rsi(&closes, 3), expected, 1e-9);
    }

    #[test]
    fn rsi_flat_series_is_100() {
        // period + 2 identical closes: no losses → 100
        assert_eq!(rsi(&[42.0; 16], 14), 100.0);
    }

    #[test]
    fn rsi_insufficient_is_neutral() {
        assert_eq!(rsi(&[1.0; 14], 14), NEUTRAL_RSI);
        assert_eq!(rsi(&[], 14), NEUTRAL_RSI);
        assert_ne!(rsi(&[1.0; 15], 14), NEUTRAL_RSI);
    }

    #[test]
    fn rsi_bounds() {
        let closes = [100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0];
        for end in 4..=closes.len() {
            let v = rsi(&closes[..end], 3);
            assert!((0.0..=100.0).contains(&v), "RSI out of bounds: {v}");
        }
    }
}
