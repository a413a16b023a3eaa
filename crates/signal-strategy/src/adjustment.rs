//! 시장 추세별 신호 조정 계수.
//!
//! 같은 신호라도 시장 추세에 따라 의미가 달라지므로, 감지기 점수에
//! 추세별 계수를 곱해 보정합니다.

use serde::{Deserialize, Serialize};
use signal_core::domain::TrendType;

/// 추세별 신호 조정 계수.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdjustmentFactors {
    /// 추세 추종 매수 신호 계수
    pub trend_follow_buy: f64,
    /// 추세 추종 매도 신호 계수
    pub trend_follow_sell: f64,
    /// 모멘텀 반전 신호 계수
    pub momentum_reversal: f64,
    /// 거래량 신호 계수
    pub volume: f64,
    /// 볼린저/켈트너 확장 신호 계수
    pub bb_kc: f64,
    /// 피봇/피보나치 레벨 신호 계수
    pub pivot_fib: f64,
}

impl AdjustmentFactors {
    /// 시장 추세에 맞는 조정 계수를 반환합니다.
    pub fn for_trend(trend: TrendType) -> Self {
        match trend {
            // 상승장: 추세 추종 매수 강화, 매도 약화
            TrendType::Bullish => Self {
                trend_follow_buy: 1.2,
                trend_follow_sell: 0.5,
                momentum_reversal: 0.8,
                volume: 1.2,
                bb_kc: 1.2,
                pivot_fib: 1.3,
            },
            // 하락장: 추세 추종 매도 강화, 매수 약화
            TrendType::Bearish => Self {
                trend_follow_buy: 0.5,
                trend_follow_sell: 1.2,
                momentum_reversal: 0.8,
                volume: 1.2,
                bb_kc: 1.2,
                pivot_fib: 0.8,
            },
            // 횡보장: 추세 신호 약화, 반전/지지저항 신호 강화
            TrendType::Neutral => Self {
                trend_follow_buy: 0.3,
                trend_follow_sell: 0.3,
                momentum_reversal: 1.5,
                volume: 1.0,
                bb_kc: 1.5,
                pivot_fib: 1.8,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullish_favors_buy() {
        let adj = AdjustmentFactors::for_trend(TrendType::Bullish);
        assert!(adj.trend_follow_buy > adj.trend_follow_sell);
    }

    #[test]
    fn test_bearish_favors_sell() {
        let adj = AdjustmentFactors::for_trend(TrendType::Bearish);
        assert!(adj.trend_follow_sell > adj.trend_follow_buy);
    }

    #[test]
    fn test_neutral_favors_reversal() {
        let adj = AdjustmentFactors::for_trend(TrendType::Neutral);
        assert!(adj.momentum_reversal > adj.trend_follow_buy);
        assert_eq!(adj.pivot_fib, 1.8);
    }
}
