//! 주식 티커 정의.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 거래 가능한 종목을 나타내는 티커.
///
/// 항상 대문자로 정규화됩니다. 예: "AAPL", "MSFT", "^VIX".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticker(String);

impl Ticker {
    /// 새 티커를 생성합니다.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into().trim().to_uppercase())
    }

    /// 티커 문자열을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_normalization() {
        let ticker = Ticker::new(" aapl ");
        assert_eq!(ticker.as_str(), "AAPL");
    }

    #[test]
    fn test_ticker_display() {
        let ticker = Ticker::new("msft");
        assert_eq!(ticker.to_string(), "MSFT");
    }
}
