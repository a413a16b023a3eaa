//! 신호 감지기.
//!
//! 각 감지기는 지표 프레임에서 한 종류의 매수/매도 근거를 찾아
//! 가중 점수로 반환합니다. 전략은 감지기 구성과 가중치로 정의됩니다.

pub mod adx;
pub mod bollinger;
pub mod composite;
pub mod fib;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stoch;
pub mod volume;

use serde::{Deserialize, Serialize};

use signal_analytics::frame::IndicatorFrame;
use signal_core::domain::{SignalEvidence, TrendType};

use crate::adjustment::AdjustmentFactors;

pub use adx::AdxDetector;
pub use bollinger::{BollingerDetector, BollingerMode};
pub use composite::CompositeDetector;
pub use fib::FibReversalDetector;
pub use macd::MacdDetector;
pub use rsi::RsiDetector;
pub use sma::SmaCrossDetector;
pub use stoch::StochDetector;
pub use volume::VolumeSurgeDetector;

/// 감지기 입력 컨텍스트.
#[derive(Debug, Clone, Copy)]
pub struct DetectorContext<'a> {
    /// 지표가 계산된 캔들 프레임
    pub frame: &'a IndicatorFrame,
    /// 시장(지수) 추세 - 점수 조정에 사용
    pub market_trend: TrendType,
    /// 종목의 장기 추세 - 최종 신호 필터에 사용
    pub long_term_trend: TrendType,
}

impl<'a> DetectorContext<'a> {
    pub fn new(
        frame: &'a IndicatorFrame,
        market_trend: TrendType,
        long_term_trend: TrendType,
    ) -> Self {
        Self {
            frame,
            market_trend,
            long_term_trend,
        }
    }

    /// 현재 시장 추세의 조정 계수.
    pub fn adjustments(&self) -> AdjustmentFactors {
        AdjustmentFactors::for_trend(self.market_trend)
    }
}

/// 신호 감지기 공통 인터페이스.
pub trait SignalDetector: Send + Sync {
    /// 감지기 이름.
    fn name(&self) -> &str;

    /// 프레임에서 매수/매도 근거를 감지합니다.
    ///
    /// 신호가 없으면 점수 0의 근거를 반환합니다.
    fn detect(&self, ctx: &DetectorContext<'_>) -> SignalEvidence;
}

/// 전략 설정에서 사용하는 감지기 종류.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DetectorSpec {
    /// SMA 골든/데드 크로스
    SmaCross { weight: f64 },
    /// MACD 크로스
    MacdCross { weight: f64 },
    /// RSI 과매수/과매도 이탈
    Rsi { weight: f64 },
    /// 스토캐스틱 %K/%D 크로스
    Stoch { weight: f64 },
    /// ADX 강한 추세
    Adx { weight: f64 },
    /// 거래량 급증
    VolumeSurge { weight: f64 },
    /// 볼린저 밴드 (평균 회귀 / 변동성 돌파)
    Bollinger { weight: f64, mode: BollingerMode },
    /// 피보나치 레벨 + 모멘텀 반전
    FibReversal { weight: f64 },
    /// 하위 감지기 조합
    Composite {
        weight: f64,
        name: String,
        require_all: bool,
        members: Vec<DetectorSpec>,
    },
}

impl DetectorSpec {
    /// 설정에서 감지기 인스턴스를 만듭니다.
    pub fn build(&self) -> Box<dyn SignalDetector> {
        match self {
            Self::SmaCross { weight } => Box::new(SmaCrossDetector::new(*weight)),
            Self::MacdCross { weight } => Box::new(MacdDetector::new(*weight)),
            Self::Rsi { weight } => Box::new(RsiDetector::new(*weight)),
            Self::Stoch { weight } => Box::new(StochDetector::new(*weight)),
            Self::Adx { weight } => Box::new(AdxDetector::new(*weight)),
            Self::VolumeSurge { weight } => Box::new(VolumeSurgeDetector::new(*weight)),
            Self::Bollinger { weight, mode } => Box::new(BollingerDetector::new(*weight, *mode)),
            Self::FibReversal { weight } => Box::new(FibReversalDetector::new(*weight)),
            Self::Composite {
                weight,
                name,
                require_all,
                members,
            } => {
                let built = members.iter().map(|m| m.build()).collect();
                Box::new(CompositeDetector::new(
                    name.clone(),
                    *weight,
                    *require_all,
                    built,
                ))
            }
        }
    }
}
