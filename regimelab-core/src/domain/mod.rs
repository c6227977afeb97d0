//! Domain types for regimelab

pub mod candle;
pub mod direction;

pub use candle::{Candle, CandleSeries};
pub use direction::{Bias, TradeDirection};

/// Symbol type alias
pub type Symbol = String;
