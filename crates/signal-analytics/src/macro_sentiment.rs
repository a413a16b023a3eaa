//! 거시 시장 심리 분석.
//!
//! VIX(공포 지수)와 버핏 지수(시가총액/GDP)를 해석해 시장 전반의
//! 매수/매도 심리 신호를 만듭니다. 개별 종목 신호의 보정 입력으로
//! 사용됩니다.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use signal_core::domain::SignalAction;

/// 거시 지표가 만든 심리 신호.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentSignal {
    /// 신호 방향
    pub action: SignalAction,
    /// 기여 점수
    pub score: f64,
    /// 신뢰도 (0.0 ~ 1.0)
    pub confidence: f64,
}

impl SentimentSignal {
    pub fn new(action: SignalAction, score: f64, confidence: f64) -> Self {
        Self {
            action,
            score,
            confidence,
        }
    }
}

/// VIX 수준 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VixLevel {
    /// 극단적 공포 (VIX >= 40)
    ExtremeFear,
    /// 높은 공포 (VIX >= 30)
    HighFear,
    /// 보통 공포 (VIX >= 20)
    ModerateFear,
    /// 낮은 공포 (VIX >= 12)
    LowFear,
    /// 안일 구간 (VIX < 12)
    Complacency,
}

impl VixLevel {
    /// VIX 값에서 수준을 분류합니다.
    pub fn from_value(vix: Decimal) -> Self {
        if vix >= dec!(40) {
            Self::ExtremeFear
        } else if vix >= dec!(30) {
            Self::HighFear
        } else if vix >= dec!(20) {
            Self::ModerateFear
        } else if vix >= dec!(12) {
            Self::LowFear
        } else {
            Self::Complacency
        }
    }
}

impl fmt::Display for VixLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ExtremeFear => "EXTREME_FEAR",
            Self::HighFear => "HIGH_FEAR",
            Self::ModerateFear => "MODERATE_FEAR",
            Self::LowFear => "LOW_FEAR",
            Self::Complacency => "COMPLACENCY",
        };
        write!(f, "{}", s)
    }
}

/// VIX 3일 변화 추세.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VixTrend {
    /// 급등 (3일 변화 >= +15%)
    RapidlyRising,
    /// 상승 (>= +5%)
    Rising,
    /// 급락 (<= -15%)
    RapidlyFalling,
    /// 하락 (<= -5%)
    Falling,
    /// 안정
    Stable,
}

impl VixTrend {
    /// 3일 변화율(%)에서 추세를 분류합니다.
    pub fn from_change_pct(change_pct: f64) -> Self {
        if change_pct >= 15.0 {
            Self::RapidlyRising
        } else if change_pct >= 5.0 {
            Self::Rising
        } else if change_pct <= -15.0 {
            Self::RapidlyFalling
        } else if change_pct <= -5.0 {
            Self::Falling
        } else {
            Self::Stable
        }
    }
}

/// VIX 분석 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VixAnalysis {
    /// 현재 VIX 값
    pub value: Decimal,
    /// 수준 분류
    pub level: VixLevel,
    /// 3일 추세
    pub trend: VixTrend,
    /// 3일 변화율 (%)
    pub change_3d_pct: f64,
    /// 역발상 심리 신호 (해당 시)
    pub signal: Option<SentimentSignal>,
}

impl VixAnalysis {
    /// 현재 VIX와 3일 전 값으로 분석합니다.
    ///
    /// 공포가 극심할수록 역발상 매수, 안일 구간에서는 매도 신호를
    /// 만듭니다. 신호 방향과 같은 쪽의 급등/급락 추세는 점수 +1.0,
    /// 신뢰도 +0.05로 강화하고, |3일 변화| > 20%는 점수를 +0.5
    /// 가산합니다.
    pub fn evaluate(current: Decimal, three_days_ago: Option<Decimal>) -> Self {
        let change_3d_pct = three_days_ago
            .filter(|&prev| prev > Decimal::ZERO)
            .and_then(|prev| ((current - prev) / prev * dec!(100)).to_f64())
            .unwrap_or(0.0);

        let level = VixLevel::from_value(current);
        let trend = VixTrend::from_change_pct(change_3d_pct);

        let mut signal = match level {
            VixLevel::ExtremeFear => Some(SentimentSignal::new(SignalAction::Buy, 8.0, 0.85)),
            VixLevel::HighFear => Some(SentimentSignal::new(SignalAction::Buy, 6.0, 0.75)),
            VixLevel::Complacency => Some(SentimentSignal::new(SignalAction::Sell, 5.0, 0.65)),
            VixLevel::ModerateFear | VixLevel::LowFear => None,
        };

        // 신호 방향과 일치하는 급등/급락 추세는 신호를 강화
        if let Some(s) = signal.as_mut() {
            let trend_confirms = (trend == VixTrend::RapidlyRising && s.action == SignalAction::Buy)
                || (trend == VixTrend::RapidlyFalling && s.action == SignalAction::Sell);
            if trend_confirms {
                s.score += 1.0;
                s.confidence += 0.05;
            }

            // 큰 변화폭은 방향과 무관하게 점수만 가산
            if change_3d_pct.abs() > 20.0 {
                s.score += 0.5;
            }
        }

        debug!(vix = %current, %level, change_3d_pct, "VIX 분석");

        Self {
            value: current,
            level,
            trend,
            change_3d_pct,
            signal,
        }
    }
}

/// 버핏 지수(시가총액/GDP, %) 분석 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuffettAnalysis {
    /// 지수 값 (%)
    pub ratio: Decimal,
    /// 밸류에이션 기반 신호 방향
    pub action: SignalAction,
    /// 신호 강도 (0.0 ~ 1.0)
    pub strength: f64,
}

impl BuffettAnalysis {
    /// 버핏 지수 값으로 분석합니다.
    ///
    /// 고평가 구간에서는 매도, 저평가 구간에서는 매수 방향입니다.
    pub fn evaluate(ratio: Decimal) -> Self {
        let (action, strength) = if ratio >= dec!(200) {
            (SignalAction::Sell, 0.8)
        } else if ratio >= dec!(150) {
            (SignalAction::Sell, 0.6)
        } else if ratio >= dec!(100) {
            (SignalAction::Neutral, 0.0)
        } else if ratio >= dec!(75) {
            (SignalAction::Buy, 0.5)
        } else {
            (SignalAction::Buy, 0.8)
        };

        Self {
            ratio,
            action,
            strength,
        }
    }
}

/// VIX와 버핏 지수 신호를 결합합니다.
///
/// 두 지표의 방향이 일치할 때만 신호를 만들고, 신뢰도는 두 강도의
/// 평균입니다. 방향이 어긋나면 `None`.
pub fn combined_sentiment(
    vix: &VixAnalysis,
    buffett: &BuffettAnalysis,
) -> Option<SentimentSignal> {
    let vix_signal = vix.signal?;
    if buffett.action != vix_signal.action {
        return None;
    }

    Some(SentimentSignal::new(
        vix_signal.action,
        vix_signal.score,
        (vix_signal.confidence + buffett.strength) / 2.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vix_level_boundaries() {
        assert_eq!(VixLevel::from_value(dec!(45)), VixLevel::ExtremeFear);
        assert_eq!(VixLevel::from_value(dec!(40)), VixLevel::ExtremeFear);
        assert_eq!(VixLevel::from_value(dec!(39.99)), VixLevel::HighFear);
        assert_eq!(VixLevel::from_value(dec!(30)), VixLevel::HighFear);
        assert_eq!(VixLevel::from_value(dec!(29.99)), VixLevel::ModerateFear);
        assert_eq!(VixLevel::from_value(dec!(20)), VixLevel::ModerateFear);
        assert_eq!(VixLevel::from_value(dec!(19.99)), VixLevel::LowFear);
        assert_eq!(VixLevel::from_value(dec!(12)), VixLevel::LowFear);
        assert_eq!(VixLevel::from_value(dec!(11.99)), VixLevel::Complacency);
    }

    #[test]
    fn test_vix_trend_boundaries() {
        assert_eq!(VixTrend::from_change_pct(15.0), VixTrend::RapidlyRising);
        assert_eq!(VixTrend::from_change_pct(14.9), VixTrend::Rising);
        assert_eq!(VixTrend::from_change_pct(5.0), VixTrend::Rising);
        assert_eq!(VixTrend::from_change_pct(4.9), VixTrend::Stable);
        assert_eq!(VixTrend::from_change_pct(-4.9), VixTrend::Stable);
        assert_eq!(VixTrend::from_change_pct(-5.0), VixTrend::Falling);
        assert_eq!(VixTrend::from_change_pct(-14.9), VixTrend::Falling);
        assert_eq!(VixTrend::from_change_pct(-15.0), VixTrend::RapidlyFalling);
    }

    #[test]
    fn test_vix_extreme_fear_buy_signal() {
        let analysis = VixAnalysis::evaluate(dec!(42), Some(dec!(40)));
        let signal = analysis.signal.unwrap();
        assert_eq!(signal.action, SignalAction::Buy);
        assert_eq!(signal.score, 8.0);
        assert_eq!(signal.confidence, 0.85);
    }

    #[test]
    fn test_vix_spike_boosts_signal() {
        // 30 -> 42는 +40% 급등: 추세 일치 +1.0/+0.05, 큰 변화폭 +0.5
        let analysis = VixAnalysis::evaluate(dec!(42), Some(dec!(30)));
        assert_eq!(analysis.trend, VixTrend::RapidlyRising);

        let signal = analysis.signal.unwrap();
        assert_eq!(signal.score, 9.5);
        assert!((signal.confidence - 0.90).abs() < 1e-9);
    }

    #[test]
    fn test_vix_rapid_fall_boosts_sell_signal() {
        // 13 -> 10은 -23% 급락: 안일 매도 5.0 + 추세 일치 1.0 + 변화폭 0.5
        let analysis = VixAnalysis::evaluate(dec!(10), Some(dec!(13)));
        assert_eq!(analysis.trend, VixTrend::RapidlyFalling);

        let signal = analysis.signal.unwrap();
        assert_eq!(signal.action, SignalAction::Sell);
        assert_eq!(signal.score, 6.5);
        assert!((signal.confidence - 0.70).abs() < 1e-9);
    }

    #[test]
    fn test_vix_big_change_without_trend_match_adds_half_point() {
        // 40 -> 30은 -25%: 매수 신호와 추세가 어긋나 +0.5만 가산
        let analysis = VixAnalysis::evaluate(dec!(30), Some(dec!(40)));
        assert_eq!(analysis.trend, VixTrend::RapidlyFalling);

        let signal = analysis.signal.unwrap();
        assert_eq!(signal.action, SignalAction::Buy);
        assert_eq!(signal.score, 6.5);
        assert!((signal.confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_vix_moderate_no_signal() {
        let analysis = VixAnalysis::evaluate(dec!(22), Some(dec!(21)));
        assert!(analysis.signal.is_none());
    }

    #[test]
    fn test_vix_complacency_sell_signal() {
        let analysis = VixAnalysis::evaluate(dec!(10), Some(dec!(10.5)));
        let signal = analysis.signal.unwrap();
        assert_eq!(signal.action, SignalAction::Sell);
        assert_eq!(signal.score, 5.0);
    }

    #[test]
    fn test_buffett_boundaries() {
        assert_eq!(BuffettAnalysis::evaluate(dec!(210)).action, SignalAction::Sell);
        assert_eq!(BuffettAnalysis::evaluate(dec!(210)).strength, 0.8);
        assert_eq!(BuffettAnalysis::evaluate(dec!(160)).strength, 0.6);
        assert_eq!(BuffettAnalysis::evaluate(dec!(120)).action, SignalAction::Neutral);
        assert_eq!(BuffettAnalysis::evaluate(dec!(80)).action, SignalAction::Buy);
        assert_eq!(BuffettAnalysis::evaluate(dec!(80)).strength, 0.5);
        assert_eq!(BuffettAnalysis::evaluate(dec!(60)).strength, 0.8);
    }

    #[test]
    fn test_combined_agreement() {
        // VIX 극단 공포(매수) + 버핏 저평가(매수) = 결합 매수
        let vix = VixAnalysis::evaluate(dec!(45), None);
        let buffett = BuffettAnalysis::evaluate(dec!(70));

        let combined = combined_sentiment(&vix, &buffett).unwrap();
        assert_eq!(combined.action, SignalAction::Buy);
        assert!((combined.confidence - (0.85 + 0.8) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_combined_conflict_is_none() {
        // VIX 매수 vs 버핏 고평가 매도 = 신호 없음
        let vix = VixAnalysis::evaluate(dec!(45), None);
        let buffett = BuffettAnalysis::evaluate(dec!(210));
        assert!(combined_sentiment(&vix, &buffett).is_none());
    }

    #[test]
    fn test_combined_requires_vix_signal() {
        let vix = VixAnalysis::evaluate(dec!(18), None);
        let buffett = BuffettAnalysis::evaluate(dec!(60));
        assert!(combined_sentiment(&vix, &buffett).is_none());
    }
}
