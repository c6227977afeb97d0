//! Series math: numeric primitives over plain `f64` slices.
//!
//! No domain knowledge lives here. Every function reads the trailing end of
//! the slice and returns `0.0` when there are not enough points. Callers must
//! treat that `0.0` as "insufficient data", not as a reading.

/// Arithmetic mean of the last `period` values.
pub fn moving_average(series: &[f64], period: usize) -> f64 {
    if period == 0 || series.len() < period {
        return 0.0;
    }
    let window = &series[series.len() - period..];
    window.iter().sum::<f64>() / period as f64
}

/// Exponential moving average over the whole slice.
///
/// Seed: SMA of the first `period` values. Then, left to right over the
/// remaining values: `ema = value * k + ema * (1 - k)`, `k = 2 / (period + 1)`.
pub fn exponential_average(series: &[f64], period: usize) -> f64 {
    if period == 0 || series.len() < period {
        return 0.0;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = moving_average(&series[..period], period);
    for &value in &series[period..] {
        ema = value * k + ema * (1.0 - k);
    }
    ema
}

/// Ordinary least-squares slope of the last `window` values against the
/// index `0..window`.
///
/// The result is in series units per step and is not normalized.
pub fn trend_slope(series: &[f64], window: usize) -> f64 {
    if window < 2 || series.len() < window {
        return 0.0;
    }
    let slice = &series[series.len() - window..];
    let x_mean = (window as f64 - 1.0) / 2.0;
    let y_mean = slice.iter().sum::<f64>() / window as f64;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, &y) in slice.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }
    num / den
}

/// Population standard deviation (divide by N) of the last `period` values.
pub fn std_dev(series: &[f64], period: usize) -> f64 {
    if period == 0 || series.len() < period {
        return 0.0;
    }
    let window = &series[series.len() - period..];
    let mean = moving_average(window, period);
    let var = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn moving_average_uses_trailing_window() {
        let s = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        // mean(12..=15) = 13.5
        assert_approx(moving_average(&s, 4), 13.5, DEFAULT_EPSILON);
        assert_approx(moving_average(&s, 1), 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn moving_average_insufficient_is_zero() {
        assert_eq!(moving_average(&[1.0, 2.0], 3), 0.0);
        assert_eq!(moving_average(&[1.0, 2.0], 0), 0.0);
        assert_eq!(moving_average(&[], 1), 0.0);
    }

    #[test]
    fn exponential_average_seed_and_recurrence() {
        // period 3, k = 0.5; seed = mean(1,2,3) = 2
        // 4 → 4*0.5 + 2*0.5 = 3; 5 → 5*0.5 + 3*0.5 = 4
        let s = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_approx(exponential_average(&s, 3), 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn exponential_average_exact_length_is_sma() {
        let s = [2.0, 4.0, 6.0];
        assert_approx(exponential_average(&s, 3), 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn exponential_average_insufficient_is_zero() {
        assert_eq!(exponential_average(&[1.0, 2.0], 5), 0.0);
    }

    #[test]
    fn trend_slope_of_line_is_its_gradient() {
        let s: Vec<f64> = (0..30).map(|i| 3.0 + 0.25 * i as f64).collect();
        assert_approx(trend_slope(&s, 20), 0.25, 1e-12);
        let down: Vec<f64> = (0..10).map(|i| 50.0 - 2.0 * i as f64).collect();
        assert_approx(trend_slope(&down, 10), -2.0, 1e-12);
    }

    #[test]
    fn trend_slope_flat_is_zero() {
        assert_eq!(trend_slope(&[7.0; 25], 20), 0.0);
    }

    #[test]
    fn trend_slope_insufficient_is_zero() {
        assert_eq!(trend_slope(&[1.0, 2.0, 3.0], 20), 0.0);
        assert_eq!(trend_slope(&[1.0, 2.0, 3.0], 1), 0.0);
    }

    #[test]
    fn trend_slope_only_reads_window() {
        // Noise before the window must not leak in.
        let mut s = vec![1000.0, -1000.0, 5.0];
        s.extend((0..5).map(|i| i as f64));
        assert_approx(trend_slope(&s, 5), 1.0, 1e-12);
    }

    #[test]
    fn std_dev_population() {
        // values 2,4,4,4,5,5,7,9 → population σ = 2
        let s = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_approx(std_dev(&s, 8), 2.0, DEFAULT_EPSILON);
        assert_eq!(std_dev(&[1.0; 5], 5), 0.0);
        assert_eq!(std_dev(&[1.0], 2), 0.0);
    }
}
