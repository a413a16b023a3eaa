//! 단일 전략 실행.

use serde::{Deserialize, Serialize};
use tracing::debug;

use signal_analytics::frame::IndicatorFrame;
use signal_core::domain::{
    confidence_from_score, SignalStrength, TradingSignal, TrendType,
};
use signal_core::types::Ticker;

use crate::config::{strategy_config, StrategyConfig, StrategyKind};
use crate::detectors::DetectorContext;
use crate::orchestrator::SignalOrchestrator;

/// 전략 실행 결과.
///
/// 신호 확정 여부와 무관하게 점수 내역을 담습니다. 전략 조합은 이
/// 결과들을 합성합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyAssessment {
    /// 전략 이름 (조합이면 합성 이름)
    pub strategy_name: String,
    /// 신호 확정 여부
    pub has_signal: bool,
    /// 대표 점수 (매수/매도 중 우세한 쪽)
    pub total_score: f64,
    /// 매수 점수
    pub buy_score: f64,
    /// 매도 점수
    pub sell_score: f64,
    /// 신호 강도
    pub strength: SignalStrength,
    /// 신뢰도 (0.0 ~ 1.0)
    pub confidence: f64,
    /// 감지 근거 설명
    pub details: Vec<String>,
    /// 확정된 매매 신호 (있을 때만)
    pub signal: Option<TradingSignal>,
}

impl StrategyAssessment {
    /// 점수에서 강도/신뢰도를 파생해 생성합니다.
    pub fn new(
        strategy_name: impl Into<String>,
        has_signal: bool,
        total_score: f64,
        buy_score: f64,
        sell_score: f64,
        details: Vec<String>,
        signal: Option<TradingSignal>,
    ) -> Self {
        Self {
            strategy_name: strategy_name.into(),
            has_signal,
            total_score,
            buy_score,
            sell_score,
            strength: SignalStrength::from_score(total_score),
            confidence: confidence_from_score(total_score),
            details,
            signal,
        }
    }

    /// 신뢰도를 직접 지정합니다 (조합 전용).
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }
}

/// 감지기 구성과 임계값으로 정의되는 단일 전략.
pub struct Strategy {
    config: StrategyConfig,
    orchestrator: SignalOrchestrator,
}

impl Strategy {
    /// 설정에서 전략을 만듭니다.
    pub fn from_config(config: StrategyConfig) -> Self {
        let detectors = config.detectors.iter().map(|spec| spec.build()).collect();
        let orchestrator = SignalOrchestrator::new(detectors, config.signal_threshold);
        Self {
            config,
            orchestrator,
        }
    }

    /// 카탈로그의 기본 설정으로 전략을 만듭니다.
    pub fn of_kind(kind: StrategyKind) -> Self {
        Self::from_config(strategy_config(kind))
    }

    pub fn kind(&self) -> StrategyKind {
        self.config.kind
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// 지표 프레임을 분석해 전략 결과를 만듭니다.
    pub fn analyze(
        &self,
        frame: &IndicatorFrame,
        ticker: &Ticker,
        market_trend: TrendType,
        long_term_trend: TrendType,
    ) -> StrategyAssessment {
        let _span = signal_core::analysis_span!("strategy_analyze", ticker, self.config.kind).entered();

        let ctx = DetectorContext::new(frame, market_trend, long_term_trend);
        let breakdown = self.orchestrator.score(&ctx);
        let signal = self.orchestrator.evaluate(
            ticker,
            frame,
            &breakdown,
            market_trend,
            long_term_trend,
            self.config.kind.as_str(),
        );

        debug!(
            strategy = %self.config.kind,
            buy = breakdown.buy_score,
            sell = breakdown.sell_score,
            has_signal = signal.is_some(),
            "전략 분석 완료"
        );

        StrategyAssessment::new(
            self.config.kind.as_str(),
            signal.is_some(),
            breakdown.dominant_score(),
            breakdown.buy_score,
            breakdown.sell_score,
            breakdown.all_details(),
            signal,
        )
    }
}
