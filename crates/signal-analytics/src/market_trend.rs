//! 장기 추세와 시장 상황 판정.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use signal_core::domain::TrendType;

use crate::frame::{columns, IndicatorFrame};

/// 시장 상황 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketCondition {
    /// 고변동성 (ATR 비율 > 1.5)
    HighVolatility,
    /// 저변동성 (ATR 비율 < 0.7)
    LowVolatility,
    /// 상승장
    BullMarket,
    /// 하락장
    BearMarket,
    /// 횡보장
    SidewaysMarket,
}

impl MarketCondition {
    /// 변동성 비율과 장기 추세에서 시장 상황을 판정합니다.
    ///
    /// 변동성 판정이 추세 판정보다 우선합니다.
    pub fn assess(volatility_ratio: Decimal, trend: TrendType) -> Self {
        if volatility_ratio > dec!(1.5) {
            return Self::HighVolatility;
        }
        if volatility_ratio < dec!(0.7) {
            return Self::LowVolatility;
        }
        match trend {
            TrendType::Bullish => Self::BullMarket,
            TrendType::Bearish => Self::BearMarket,
            TrendType::Neutral => Self::SidewaysMarket,
        }
    }

    /// 프레임에서 직접 시장 상황을 판정합니다.
    pub fn from_frame(frame: &IndicatorFrame) -> Self {
        let ratio = atr_volatility_ratio(frame).unwrap_or(Decimal::ONE);
        let trend = long_term_trend(frame);
        let condition = Self::assess(ratio, trend);
        debug!(%ratio, %trend, condition = %condition, "시장 상황 판정");
        condition
    }
}

impl fmt::Display for MarketCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::HighVolatility => "HIGH_VOLATILITY",
            Self::LowVolatility => "LOW_VOLATILITY",
            Self::BullMarket => "BULL_MARKET",
            Self::BearMarket => "BEAR_MARKET",
            Self::SidewaysMarket => "SIDEWAYS_MARKET",
        };
        write!(f, "{}", s)
    }
}

/// 장기 추세 판정.
///
/// 종가 > 20일 SMA > 60일 SMA이면 상승, 종가 < 20일 SMA < 60일 SMA이면
/// 하락, 그 외에는 중립입니다.
pub fn long_term_trend(frame: &IndicatorFrame) -> TrendType {
    let (Some(close), Some(sma_mid), Some(sma_long)) = (
        frame.latest_close(),
        frame.latest(columns::SMA_MID),
        frame.latest(columns::SMA_LONG),
    ) else {
        return TrendType::Neutral;
    };

    if close > sma_mid && sma_mid > sma_long {
        TrendType::Bullish
    } else if close < sma_mid && sma_mid < sma_long {
        TrendType::Bearish
    } else {
        TrendType::Neutral
    }
}

/// 최근 변동성 비율.
///
/// 최근 5개 ATR 평균 / 전체 ATR 평균. 1보다 크면 최근 변동성이
/// 평소보다 높다는 의미입니다.
pub fn atr_volatility_ratio(frame: &IndicatorFrame) -> Option<Decimal> {
    let atr_column = frame.column(columns::ATR)?;
    let values: Vec<Decimal> = atr_column.iter().flatten().copied().collect();
    if values.is_empty() {
        return None;
    }

    let overall: Decimal = values.iter().sum::<Decimal>() / Decimal::from(values.len());
    if overall == Decimal::ZERO {
        return None;
    }

    let recent_window = values.len().min(5);
    let recent_slice = &values[values.len() - recent_window..];
    let recent: Decimal = recent_slice.iter().sum::<Decimal>() / Decimal::from(recent_window);

    Some(recent / overall)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::IndicatorSettings;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use signal_core::domain::Kline;
    use signal_core::types::{Ticker, Timeframe};

    fn bars_from_closes(closes: &[Decimal]) -> Vec<Kline> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                Kline::new(
                    Ticker::new("TEST"),
                    Timeframe::D1,
                    Utc.timestamp_opt(1_700_000_000 + i as i64 * 86_400, 0).unwrap(),
                    close - dec!(1),
                    close + dec!(2),
                    close - dec!(2),
                    close,
                    dec!(1000000),
                )
            })
            .collect()
    }

    #[test]
    fn test_long_term_trend_bullish() {
        // 꾸준한 상승: 종가 > SMA20 > SMA60
        let closes: Vec<Decimal> = (0..80).map(|i| Decimal::from(100 + i)).collect();
        let frame =
            IndicatorFrame::compute(bars_from_closes(&closes), &IndicatorSettings::default())
                .unwrap();
        assert_eq!(long_term_trend(&frame), TrendType::Bullish);
    }

    #[test]
    fn test_long_term_trend_bearish() {
        let closes: Vec<Decimal> = (0..80).map(|i| Decimal::from(300 - i)).collect();
        let frame =
            IndicatorFrame::compute(bars_from_closes(&closes), &IndicatorSettings::default())
                .unwrap();
        assert_eq!(long_term_trend(&frame), TrendType::Bearish);
    }

    #[test]
    fn test_long_term_trend_neutral() {
        // 횡보: 100과 102 사이 진동
        let closes: Vec<Decimal> = (0..80)
            .map(|i| if i % 2 == 0 { dec!(100) } else { dec!(102) })
            .collect();
        let frame =
            IndicatorFrame::compute(bars_from_closes(&closes), &IndicatorSettings::default())
                .unwrap();
        assert_eq!(long_term_trend(&frame), TrendType::Neutral);
    }

    #[test]
    fn test_market_condition_assess() {
        assert_eq!(
            MarketCondition::assess(dec!(1.6), TrendType::Bullish),
            MarketCondition::HighVolatility
        );
        assert_eq!(
            MarketCondition::assess(dec!(0.6), TrendType::Bullish),
            MarketCondition::LowVolatility
        );
        assert_eq!(
            MarketCondition::assess(dec!(1.0), TrendType::Bullish),
            MarketCondition::BullMarket
        );
        assert_eq!(
            MarketCondition::assess(dec!(1.0), TrendType::Bearish),
            MarketCondition::BearMarket
        );
        assert_eq!(
            MarketCondition::assess(dec!(1.0), TrendType::Neutral),
            MarketCondition::SidewaysMarket
        );
    }

    #[test]
    fn test_volatility_ratio_steady_market() {
        // 변동폭이 일정하면 비율은 1에 가까움
        let closes: Vec<Decimal> = (0..80).map(|i| Decimal::from(100 + (i % 3))).collect();
        let frame =
            IndicatorFrame::compute(bars_from_closes(&closes), &IndicatorSettings::default())
                .unwrap();

        let ratio = atr_volatility_ratio(&frame).unwrap();
        assert!(ratio > dec!(0.7) && ratio < dec!(1.3));
    }
}
