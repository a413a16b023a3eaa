//! OHLCV 캔들 데이터.

use crate::types::{Ticker, Timeframe};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OHLCV 캔들.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kline {
    /// 종목 티커
    pub ticker: Ticker,
    /// 타임프레임
    pub timeframe: Timeframe,
    /// 캔들 시작 시간
    pub open_time: DateTime<Utc>,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: Decimal,
}

impl Kline {
    /// 새 캔들을 생성합니다.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ticker: Ticker,
        timeframe: Timeframe,
        open_time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            ticker,
            timeframe,
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 캔들 몸통 크기(절대값)를 반환합니다.
    pub fn body_size(&self) -> Decimal {
        (self.close - self.open).abs()
    }

    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 음봉(종가 < 시가)인지 확인합니다.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// 대표가(고가+저가+종가 평균)를 반환합니다.
    pub fn typical_price(&self) -> Decimal {
        (self.high + self.low + self.close) / Decimal::from(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_kline(open: Decimal, close: Decimal) -> Kline {
        Kline::new(
            Ticker::new("AAPL"),
            Timeframe::D1,
            Utc::now(),
            open,
            open.max(close) + dec!(1),
            open.min(close) - dec!(1),
            close,
            dec!(1000000),
        )
    }

    #[test]
    fn test_kline_direction() {
        let bull = sample_kline(dec!(100), dec!(105));
        assert!(bull.is_bullish());
        assert!(!bull.is_bearish());
        assert_eq!(bull.body_size(), dec!(5));

        let bear = sample_kline(dec!(105), dec!(100));
        assert!(bear.is_bearish());
    }

    #[test]
    fn test_kline_range() {
        let k = sample_kline(dec!(100), dec!(105));
        assert_eq!(k.range(), dec!(7)); // 106 - 99
    }
}
