//! 전략 카탈로그.
//!
//! 각 전략은 감지기 구성, 가중치, 신호 임계값, 거래당 리스크로
//! 정의됩니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::detectors::{BollingerMode, DetectorSpec};
use crate::error::StrategyError;

/// 제공되는 전략 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// 보수적 전략 (높은 임계값, 복합 확인)
    Conservative,
    /// 균형잡힌 기본 전략
    Balanced,
    /// 공격적 전략 (낮은 임계값)
    Aggressive,
    /// 모멘텀 지표 중심 전략
    Momentum,
    /// 추세 추종 전략
    TrendFollowing,
    /// 역추세 전략
    Contrarian,
    /// 단기 스캘핑 전략
    Scalping,
    /// 중기 스윙 전략
    Swing,
    /// 평균 회귀 전략
    MeanReversion,
    /// 추세 추종 눌림목 전략
    TrendPullback,
    /// 변동성 돌파 전략
    VolatilityBreakout,
    /// 고신뢰도 복합 추세 전략
    QualityTrend,
    /// 다중 시간대 확인 전략
    MultiTimeframe,
    /// 거시지표 기반 전략
    MacroDriven,
}

impl StrategyKind {
    /// 전체 전략 목록.
    pub const ALL: [StrategyKind; 14] = [
        Self::Conservative,
        Self::Balanced,
        Self::Aggressive,
        Self::Momentum,
        Self::TrendFollowing,
        Self::Contrarian,
        Self::Scalping,
        Self::Swing,
        Self::MeanReversion,
        Self::TrendPullback,
        Self::VolatilityBreakout,
        Self::QualityTrend,
        Self::MultiTimeframe,
        Self::MacroDriven,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Balanced => "balanced",
            Self::Aggressive => "aggressive",
            Self::Momentum => "momentum",
            Self::TrendFollowing => "trend_following",
            Self::Contrarian => "contrarian",
            Self::Scalping => "scalping",
            Self::Swing => "swing",
            Self::MeanReversion => "mean_reversion",
            Self::TrendPullback => "trend_pullback",
            Self::VolatilityBreakout => "volatility_breakout",
            Self::QualityTrend => "quality_trend",
            Self::MultiTimeframe => "multi_timeframe",
            Self::MacroDriven => "macro_driven",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .find(|kind| kind.as_str() == normalized)
            .copied()
            .ok_or_else(|| StrategyError::UnknownStrategy(s.to_string()))
    }
}

/// 전략 정의.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// 전략 종류
    pub kind: StrategyKind,
    /// 설명
    pub description: String,
    /// 신호 확정 임계값
    pub signal_threshold: f64,
    /// 거래당 리스크 비율 (자본 대비)
    pub risk_per_trade: f64,
    /// 감지기 구성
    pub detectors: Vec<DetectorSpec>,
}

/// 전략 종류별 기본 설정을 반환합니다.
pub fn strategy_config(kind: StrategyKind) -> StrategyConfig {
    match kind {
        StrategyKind::Conservative => StrategyConfig {
            kind,
            description: "높은 신뢰도의 강한 신호만 사용하는 안전한 전략".to_string(),
            signal_threshold: 12.0,
            risk_per_trade: 0.01,
            detectors: vec![
                DetectorSpec::SmaCross { weight: 7.5 },
                DetectorSpec::MacdCross { weight: 7.5 },
                DetectorSpec::VolumeSurge { weight: 6.0 },
                macd_volume_confirm(10.0),
            ],
        },
        StrategyKind::Balanced => StrategyConfig {
            kind,
            description: "다양한 신호를 균형있게 사용하는 기본 전략".to_string(),
            signal_threshold: 8.0,
            risk_per_trade: 0.02,
            detectors: vec![
                DetectorSpec::SmaCross { weight: 5.0 },
                DetectorSpec::MacdCross { weight: 5.0 },
                DetectorSpec::Rsi { weight: 3.0 },
                DetectorSpec::VolumeSurge { weight: 4.0 },
                DetectorSpec::Adx { weight: 4.0 },
                macd_volume_confirm(7.0),
            ],
        },
        StrategyKind::Aggressive => StrategyConfig {
            kind,
            description: "낮은 임계값으로 많은 거래 기회를 포착하는 전략".to_string(),
            signal_threshold: 5.0,
            risk_per_trade: 0.03,
            detectors: vec![
                DetectorSpec::SmaCross { weight: 4.0 },
                DetectorSpec::MacdCross { weight: 4.0 },
                DetectorSpec::Rsi { weight: 3.0 },
                DetectorSpec::Stoch { weight: 3.0 },
                DetectorSpec::VolumeSurge { weight: 3.0 },
                DetectorSpec::Adx { weight: 3.0 },
            ],
        },
        StrategyKind::Momentum => StrategyConfig {
            kind,
            description: "RSI, 스토캐스틱 등 모멘텀 지표 중심 전략".to_string(),
            signal_threshold: 6.0,
            risk_per_trade: 0.025,
            detectors: vec![
                DetectorSpec::Rsi { weight: 6.0 },
                DetectorSpec::Stoch { weight: 5.0 },
                DetectorSpec::MacdCross { weight: 4.0 },
                DetectorSpec::VolumeSurge { weight: 3.0 },
                DetectorSpec::Composite {
                    weight: 8.0,
                    name: "rsi_stoch_confirm".to_string(),
                    require_all: true,
                    members: vec![
                        DetectorSpec::Rsi { weight: 1.0 },
                        DetectorSpec::Stoch { weight: 1.0 },
                    ],
                },
            ],
        },
        StrategyKind::TrendFollowing => StrategyConfig {
            kind,
            description: "SMA, MACD, ADX 등 추세 지표 중심 전략".to_string(),
            signal_threshold: 7.0,
            risk_per_trade: 0.02,
            detectors: vec![
                DetectorSpec::SmaCross { weight: 7.0 },
                DetectorSpec::MacdCross { weight: 6.0 },
                DetectorSpec::Adx { weight: 6.0 },
                DetectorSpec::VolumeSurge { weight: 4.0 },
                macd_volume_confirm(8.0),
            ],
        },
        StrategyKind::Contrarian => StrategyConfig {
            kind,
            description: "과매수/과매도 상황에서 반대 방향으로 진입하는 전략".to_string(),
            signal_threshold: 8.0,
            risk_per_trade: 0.02,
            detectors: vec![
                DetectorSpec::Rsi { weight: 6.0 },
                DetectorSpec::Stoch { weight: 5.0 },
                DetectorSpec::Bollinger {
                    weight: 4.0,
                    mode: BollingerMode::MeanReversion,
                },
                DetectorSpec::FibReversal { weight: 7.0 },
            ],
        },
        StrategyKind::Scalping => StrategyConfig {
            kind,
            description: "빠른 진입/청산을 위한 단기 전략".to_string(),
            signal_threshold: 4.0,
            risk_per_trade: 0.01,
            detectors: vec![
                DetectorSpec::Rsi { weight: 4.0 },
                DetectorSpec::Stoch { weight: 4.0 },
                DetectorSpec::VolumeSurge { weight: 5.0 },
                DetectorSpec::MacdCross { weight: 3.0 },
            ],
        },
        StrategyKind::Swing => StrategyConfig {
            kind,
            description: "중기 추세 변화를 포착하는 전략".to_string(),
            signal_threshold: 7.0,
            risk_per_trade: 0.025,
            detectors: vec![
                DetectorSpec::SmaCross { weight: 5.0 },
                DetectorSpec::MacdCross { weight: 6.0 },
                DetectorSpec::Rsi { weight: 4.0 },
                DetectorSpec::Adx { weight: 4.0 },
            ],
        },
        StrategyKind::MeanReversion => StrategyConfig {
            kind,
            description: "과매수/과매도 후 평균으로 회귀하는 경향을 이용하는 전략".to_string(),
            signal_threshold: 7.0,
            risk_per_trade: 0.015,
            detectors: vec![
                DetectorSpec::Bollinger {
                    weight: 6.0,
                    mode: BollingerMode::MeanReversion,
                },
                DetectorSpec::Rsi { weight: 4.0 },
                DetectorSpec::Stoch { weight: 3.0 },
                DetectorSpec::FibReversal { weight: 7.0 },
            ],
        },
        StrategyKind::TrendPullback => StrategyConfig {
            kind,
            description: "상승 추세 중 일시적 하락(눌림목) 시 매수하는 전략".to_string(),
            signal_threshold: 8.0,
            risk_per_trade: 0.02,
            detectors: vec![
                DetectorSpec::SmaCross { weight: 5.0 },
                DetectorSpec::Adx { weight: 4.0 },
                DetectorSpec::Rsi { weight: 6.0 },
            ],
        },
        StrategyKind::VolatilityBreakout => StrategyConfig {
            kind,
            description: "변동성 응축 후 폭발하는 시점을 포착하는 전략".to_string(),
            signal_threshold: 6.0,
            risk_per_trade: 0.025,
            detectors: vec![
                DetectorSpec::Bollinger {
                    weight: 7.0,
                    mode: BollingerMode::Breakout,
                },
                DetectorSpec::Adx { weight: 4.0 },
                DetectorSpec::VolumeSurge { weight: 5.0 },
            ],
        },
        StrategyKind::QualityTrend => StrategyConfig {
            kind,
            description: "여러 추세 지표가 모두 동의할 때만 진입하는 보수적 추세 전략".to_string(),
            signal_threshold: 10.0,
            risk_per_trade: 0.01,
            detectors: vec![DetectorSpec::Composite {
                weight: 10.0,
                name: "quality_trend_confirm".to_string(),
                require_all: true,
                members: vec![
                    DetectorSpec::SmaCross { weight: 1.0 },
                    DetectorSpec::MacdCross { weight: 1.0 },
                    DetectorSpec::Adx { weight: 1.0 },
                ],
            }],
        },
        StrategyKind::MultiTimeframe => StrategyConfig {
            kind,
            description: "장기 추세와 단기 진입 신호를 함께 확인하는 전략".to_string(),
            signal_threshold: 9.0,
            risk_per_trade: 0.02,
            detectors: vec![
                DetectorSpec::MacdCross { weight: 5.0 },
                DetectorSpec::Stoch { weight: 5.0 },
                DetectorSpec::Rsi { weight: 4.0 },
            ],
        },
        StrategyKind::MacroDriven => StrategyConfig {
            kind,
            description: "VIX와 버핏지수 등 거시 지표를 기술적 분석과 결합한 전략".to_string(),
            signal_threshold: 7.0,
            risk_per_trade: 0.015,
            detectors: vec![
                DetectorSpec::MacdCross { weight: 4.0 },
                DetectorSpec::Rsi { weight: 3.0 },
                DetectorSpec::Stoch { weight: 3.0 },
                DetectorSpec::VolumeSurge { weight: 2.0 },
            ],
        },
    }
}

/// MACD + 거래량 동시 확인 복합 감지기.
fn macd_volume_confirm(weight: f64) -> DetectorSpec {
    DetectorSpec::Composite {
        weight,
        name: "macd_volume_confirm".to_string(),
        require_all: true,
        members: vec![
            DetectorSpec::MacdCross { weight: 1.0 },
            DetectorSpec::VolumeSurge { weight: 1.0 },
        ],
    }
}
