//! Property tests for indicator and risk invariants.
//!
//! Uses proptest to verify:
//! 1. Indicator ranges: RSI and ADX within [0, 100], ATR non-negative
//! 2. Neutral fallbacks: flat RSI is 100, short ATR is 0
//! 3. Risk geometry: stop on the loss side, rungs strictly farther out
//! 4. Determinism: same candles give the same snapshot and fingerprint

use proptest::prelude::*;
use regimelab_core::indicators::{adx, atr, rsi};
use regimelab_core::{
    classify_regime, compute_indicators, compute_risk, AnalyticsError, Candle, CandleSeries,
    MarketPhase, MarketRegime, SeriesFingerprint, TradeDirection, Trend, VolatilityBand,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..1000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

/// Valid candles: positive prices, high ≥ max(open, close), low ≤ min.
fn arb_candles(min: usize, max: usize) -> impl Strategy<Value = Vec<Candle>> {
    prop::collection::vec((arb_price(), arb_price(), 0.0..5.0_f64, 0.0..5.0_f64, 0.0..1e6_f64), min..max)
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (open, close, up, down, volume))| {
                    let high = open.max(close) + up;
                    let low = (open.min(close) - down).max(0.01);
                    Candle::new(i as i64 * 60_000, open, high, low, close, volume)
                })
                .collect()
        })
}

fn arb_regime() -> impl Strategy<Value = MarketRegime> {
    let band = prop_oneof![
        Just(VolatilityBand::Low),
        Just(VolatilityBand::Medium),
        Just(VolatilityBand::High),
        Just(VolatilityBand::Panic),
    ];
    let phase = prop_oneof![
        Just(MarketPhase::Accumulation),
        Just(MarketPhase::Markup),
        Just(MarketPhase::Distribution),
        Just(MarketPhase::Markdown),
        Just(MarketPhase::Neutral),
    ];
    (band, phase, any::<bool>()).prop_map(|(volatility, phase, crisis_mode)| MarketRegime {
        trend: Trend::Neutral,
        strength: 20.0,
        volatility,
        volatility_value: 1.0,
        phase,
        crisis_mode,
    })
}

fn arb_direction() -> impl Strategy<Value = TradeDirection> {
    prop_oneof![
        Just(TradeDirection::StrongBuy),
        Just(TradeDirection::Buy),
        Just(TradeDirection::Sell),
        Just(TradeDirection::StrongSell),
    ]
}

// ── 1. Indicator ranges ──────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_within_bounds(closes in prop::collection::vec(arb_price(), 0..200), period in 1usize..30) {
        let value = rsi(&closes, period);
        prop_assert!((0.0..=100.0).contains(&value), "rsi = {}", value);
    }

    #[test]
    fn adx_within_bounds(candles in arb_candles(1, 150), period in 1usize..20) {
        let value = adx(&candles, period);
        prop_assert!((0.0..=100.0).contains(&value), "adx = {}", value);
    }

    #[test]
    fn atr_non_negative(candles in arb_candles(1, 150), period in 1usize..30) {
        prop_assert!(atr(&candles, period) >= 0.0);
    }
}

// ── 2. Neutral fallbacks ─────────────────────────────────────────────

proptest! {
    #[test]
    fn flat_closes_give_rsi_100(price in arb_price(), period in 1usize..30) {
        let closes = vec![price; period + 2];
        prop_assert_eq!(rsi(&closes, period), 100.0);
    }

    #[test]
    fn short_history_gives_zero_atr(candles in arb_candles(1, 15)) {
        // at most 14 candles, never period + 1 for period 14
        prop_assert_eq!(atr(&candles, 14), 0.0);
    }

    #[test]
    fn regime_needs_fifty_candles(candles in arb_candles(1, 50)) {
        let series = CandleSeries::new(candles).unwrap();
        let is_insufficient = matches!(
            classify_regime(&series),
            Err(AnalyticsError::InsufficientData { .. })
        );
        prop_assert!(is_insufficient);
    }
}

// ── 3. Risk geometry ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn stop_and_ladder_sides(
        candles in arb_candles(30, 80),
        regime in arb_regime(),
        direction in arb_direction(),
    ) {
        let series = CandleSeries::new(candles).unwrap();
        let snapshot = compute_indicators(&series);
        let entry = series.last().close;
        let risk = compute_risk(entry, direction, &regime, &snapshot).unwrap();

        if direction.is_long() {
            prop_assert!(risk.stop_loss < entry);
            prop_assert!(risk.take_profit.iter().all(|&tp| tp > entry));
        } else {
            prop_assert!(risk.stop_loss > entry);
            prop_assert!(risk.take_profit.iter().all(|&tp| tp < entry));
        }

        let d: Vec<f64> = risk.take_profit.iter().map(|tp| (tp - entry).abs()).collect();
        prop_assert!(d[0] < d[1] && d[1] < d[2]);
        prop_assert!(risk.trailing_stop_distance > 0.0);
    }
}

// ── 4. Determinism ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn snapshot_is_deterministic(candles in arb_candles(1, 120)) {
        let a = CandleSeries::new(candles.clone()).unwrap();
        let b = CandleSeries::new(candles).unwrap();
        prop_assert_eq!(compute_indicators(&a), compute_indicators(&b));
        prop_assert_eq!(SeriesFingerprint::of(&a), SeriesFingerprint::of(&b));
    }
}
