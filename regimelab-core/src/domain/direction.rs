//! Trade direction supplied by the signal classifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnalyticsError;

/// Directional decision for a symbol.
///
/// Buy-family directions carry a long bias, sell-family a short bias.
/// `Neutral` has no risk semantics and is rejected by risk computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeDirection {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

/// Side of the book a direction maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bias {
    Long,
    Short,
}

impl TradeDirection {
    pub fn bias(self) -> Option<Bias> {
        match self {
            Self::StrongBuy | Self::Buy => Some(Bias::Long),
            Self::Sell | Self::StrongSell => Some(Bias::Short),
            Self::Neutral => None,
        }
    }

    pub fn is_long(self) -> bool {
        self.bias() == Some(Bias::Long)
    }

    pub fn is_short(self) -> bool {
        self.bias() == Some(Bias::Short)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG_BUY",
            Self::Buy => "BUY",
            Self::Neutral => "NEUTRAL",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG_SELL",
        }
    }
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeDirection {
    type Err = AnalyticsError;

    /// Accepts the wire form (`STRONG_BUY`) as well as the spaced display
    /// form (`STRONG BUY`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "STRONG_BUY" => Ok(Self::StrongBuy),
            "BUY" => Ok(Self::Buy),
            "NEUTRAL" => Ok(Self::Neutral),
            "SELL" => Ok(Self::Sell),
            "STRONG_SELL" => Ok(Self::StrongSell),
            _ => Err(AnalyticsError::InvalidInput(format!(
                "unknown trade direction '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_mapping() {
        assert_eq!(TradeDirection::StrongBuy.bias(), Some(Bias::Long));
        assert_eq!(TradeDirection::Buy.bias(), Some(Bias::Long));
        assert_eq!(TradeDirection::Sell.bias(), Some(Bias::Short));
        assert_eq!(TradeDirection::StrongSell.bias(), Some(Bias::Short));
        assert_eq!(TradeDirection::Neutral.bias(), None);
    }

    #[test]
    fn parses_wire_and_display_forms() {
        assert_eq!("STRONG_BUY".parse::<TradeDirection>().unwrap(), TradeDirection::StrongBuy);
        assert_eq!("strong sell".parse::<TradeDirection>().unwrap(), TradeDirection::StrongSell);
        assert_eq!(" buy ".parse::<TradeDirection>().unwrap(), TradeDirection::Buy);
        assert!("HOLD".parse::<TradeDirection>().is_err());
    }

    #[test]
    fn serde_uses_wire_form() {
        let json = serde_json::to_string(&TradeDirection::StrongSell).unwrap();
        assert_eq!(json, "\"STRONG_SELL\"");
        let back: TradeDirection = serde_json::from_str("\"BUY\"").unwrap();
        assert_eq!(back, TradeDirection::Buy);
    }
}
