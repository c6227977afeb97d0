//! Risk: turns a directional decision into concrete price levels and size.
//!
//! `stops` derives the stop-loss, take-profit ladder and trailing distance
//! from the regime and indicator snapshot. `calibration` blends external
//! confidence inputs and bounds the position size. `journal` keeps realised
//! trade outcomes for a dynamic win/loss ratio.

pub mod calibration;
pub mod journal;
pub mod stops;

pub use calibration::{
    calibrate_confidence, estimate_kelly, expected_value, volatility_size_multiplier,
    CalibratedConfidence, MAX_POSITION_PCT, MIN_POSITION_PCT,
};
pub use journal::{TradeJournal, DEFAULT_WIN_LOSS_RATIO};
pub use stops::{
    compute_risk, expansion_factor, phase_buffer, stop_multiplier, tightening_factor,
    RiskParameters, TAKE_PROFIT_RATIOS,
};
