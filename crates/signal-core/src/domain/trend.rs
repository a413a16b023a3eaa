//! 시장 추세 유형.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 시장/종목의 추세 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendType {
    /// 상승 추세
    Bullish,
    /// 하락 추세
    Bearish,
    /// 횡보/중립
    Neutral,
}

impl Default for TrendType {
    fn default() -> Self {
        Self::Neutral
    }
}

impl fmt::Display for TrendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Bullish => "BULLISH",
            Self::Bearish => "BEARISH",
            Self::Neutral => "NEUTRAL",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TrendType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BULLISH" => Ok(Self::Bullish),
            "BEARISH" => Ok(Self::Bearish),
            "NEUTRAL" => Ok(Self::Neutral),
            _ => Err(format!("Unknown trend type: {}", s)),
        }
    }
}
