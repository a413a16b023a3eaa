//! 매매 신호 도메인 모델.
//!
//! 이 모듈은 전략이 생성하는 매매 신호 관련 타입을 정의합니다:
//! - `SignalAction` - 신호 방향 (매수/매도/중립)
//! - `SignalStrength` - 점수 기반 신호 강도
//! - `SignalEvidence` - 감지기별 기여 근거
//! - `TradingSignal` - 매매 신호 엔티티

use crate::types::Ticker;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 신호 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalAction {
    /// 매수
    Buy,
    /// 매도
    Sell,
    /// 관망
    Neutral,
}

impl fmt::Display for SignalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Neutral => "NEUTRAL",
        };
        write!(f, "{}", s)
    }
}

/// 점수 기반 신호 강도.
///
/// 총점 기준: 6점 미만 WEAK, 10점 미만 MODERATE, 10점 이상 STRONG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalStrength {
    /// 약한 신호 (< 6)
    Weak,
    /// 보통 신호 (< 10)
    Moderate,
    /// 강한 신호 (>= 10)
    Strong,
}

impl SignalStrength {
    /// 총점에서 강도를 계산합니다.
    pub fn from_score(score: f64) -> Self {
        if score >= 10.0 {
            Self::Strong
        } else if score >= 6.0 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }
}

impl fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Weak => "WEAK",
            Self::Moderate => "MODERATE",
            Self::Strong => "STRONG",
        };
        write!(f, "{}", s)
    }
}

/// 총점을 신뢰도(0.0 ~ 1.0)로 정규화합니다.
///
/// 15점 만점 기준.
pub fn confidence_from_score(score: f64) -> f64 {
    (score / 15.0).clamp(0.0, 1.0)
}

/// 감지기별 신호 근거.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalEvidence {
    /// 감지기 이름
    pub detector: String,
    /// 매수 기여 점수
    pub buy_score: f64,
    /// 매도 기여 점수
    pub sell_score: f64,
    /// 상세 설명
    pub details: Vec<String>,
}

impl SignalEvidence {
    /// 새 근거를 생성합니다.
    pub fn new(detector: impl Into<String>, buy_score: f64, sell_score: f64) -> Self {
        Self {
            detector: detector.into(),
            buy_score,
            sell_score,
            details: vec![],
        }
    }

    /// 상세 설명을 추가합니다.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }
}

/// 전략이 생성한 매매 신호.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSignal {
    /// 고유 신호 ID
    pub id: Uuid,
    /// 종목 티커
    pub ticker: Ticker,
    /// 신호 방향
    pub action: SignalAction,
    /// 이 신호를 생성한 전략
    pub strategy: String,
    /// 총점 (가중 감지기 점수 합)
    pub total_score: f64,
    /// 신호 강도
    pub strength: SignalStrength,
    /// 신뢰도 (0.0 ~ 1.0)
    pub confidence: f64,
    /// 신호 발생 시점 가격
    pub price: Decimal,
    /// 제안 손절가 (선택)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<Decimal>,
    /// 감지기별 근거
    #[serde(default)]
    pub evidence: Vec<SignalEvidence>,
    /// 신호 생성 타임스탬프
    pub timestamp: DateTime<Utc>,
}

impl TradingSignal {
    /// 새 신호를 생성합니다. 강도와 신뢰도는 총점에서 파생됩니다.
    pub fn new(
        ticker: Ticker,
        action: SignalAction,
        strategy: impl Into<String>,
        total_score: f64,
        price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticker,
            action,
            strategy: strategy.into(),
            total_score,
            strength: SignalStrength::from_score(total_score),
            confidence: confidence_from_score(total_score),
            price,
            stop_loss: None,
            evidence: vec![],
            timestamp: Utc::now(),
        }
    }

    /// 매수 신호를 생성합니다.
    pub fn buy(ticker: Ticker, strategy: impl Into<String>, score: f64, price: Decimal) -> Self {
        Self::new(ticker, SignalAction::Buy, strategy, score, price)
    }

    /// 매도 신호를 생성합니다.
    pub fn sell(ticker: Ticker, strategy: impl Into<String>, score: f64, price: Decimal) -> Self {
        Self::new(ticker, SignalAction::Sell, strategy, score, price)
    }

    /// 손절가를 설정합니다.
    pub fn with_stop_loss(mut self, stop_loss: Decimal) -> Self {
        self.stop_loss = Some(stop_loss);
        self
    }

    /// 근거 목록을 설정합니다.
    pub fn with_evidence(mut self, evidence: Vec<SignalEvidence>) -> Self {
        self.evidence = evidence;
        self
    }

    /// 타임스탬프를 설정합니다 (백테스트용).
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// 강한 신호인지 확인합니다.
    pub fn is_strong(&self) -> bool {
        self.strength == SignalStrength::Strong
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_strength_from_score_boundaries() {
        assert_eq!(SignalStrength::from_score(5.9), SignalStrength::Weak);
        assert_eq!(SignalStrength::from_score(6.0), SignalStrength::Moderate);
        assert_eq!(SignalStrength::from_score(9.9), SignalStrength::Moderate);
        assert_eq!(SignalStrength::from_score(10.0), SignalStrength::Strong);
    }

    #[test]
    fn test_confidence_normalization() {
        assert!((confidence_from_score(7.5) - 0.5).abs() < 1e-9);
        assert_eq!(confidence_from_score(15.0), 1.0);
        assert_eq!(confidence_from_score(30.0), 1.0); // 상한 클램프
    }

    #[test]
    fn test_signal_builder() {
        let signal = TradingSignal::buy(Ticker::new("AAPL"), "balanced", 12.5, dec!(185.20))
            .with_stop_loss(dec!(180.00))
            .with_evidence(vec![SignalEvidence::new("sma_cross", 3.0, 0.0)
                .with_detail("골든 크로스 발생")]);

        assert_eq!(signal.action, SignalAction::Buy);
        assert_eq!(signal.strength, SignalStrength::Strong);
        assert!(signal.is_strong());
        assert_eq!(signal.stop_loss, Some(dec!(180.00)));
        assert_eq!(signal.evidence.len(), 1);
    }

    #[test]
    fn test_action_display() {
        assert_eq!(SignalAction::Buy.to_string(), "BUY");
        assert_eq!(SignalAction::Sell.to_string(), "SELL");
        assert_eq!(SignalAction::Neutral.to_string(), "NEUTRAL");
    }
}
