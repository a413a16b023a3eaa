//! 거시 시장 지표 종류.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 외부에서 수집되는 거시 시장 지표.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketIndicatorKind {
    /// VIX 변동성 지수
    Vix,
    /// 버핏 지수 (시가총액 / GDP, %)
    BuffettIndicator,
    /// CNN Fear & Greed 지수
    FearGreed,
    /// Put/Call 비율
    PutCallRatio,
}

impl MarketIndicatorKind {
    /// 저장소에서 사용하는 식별자 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vix => "vix",
            Self::BuffettIndicator => "buffett_indicator",
            Self::FearGreed => "fear_greed",
            Self::PutCallRatio => "put_call_ratio",
        }
    }
}

impl fmt::Display for MarketIndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MarketIndicatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vix" => Ok(Self::Vix),
            "buffett_indicator" => Ok(Self::BuffettIndicator),
            "fear_greed" => Ok(Self::FearGreed),
            "put_call_ratio" => Ok(Self::PutCallRatio),
            _ => Err(format!("Unknown market indicator: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            MarketIndicatorKind::Vix,
            MarketIndicatorKind::BuffettIndicator,
            MarketIndicatorKind::FearGreed,
            MarketIndicatorKind::PutCallRatio,
        ] {
            assert_eq!(kind.as_str().parse::<MarketIndicatorKind>().unwrap(), kind);
        }
    }
}
