//! 전략 매니저.
//!
//! 기동 시 주입되는 설정으로 단일 전략 / 전략 조합 / 자동 선택 모드를
//! 결정하고, 분석 요청을 해당 전략으로 라우팅합니다.

use tracing::{debug, info};

use signal_analytics::frame::IndicatorFrame;
use signal_analytics::market_trend::{atr_volatility_ratio, MarketCondition};
use signal_core::domain::TrendType;
use signal_core::types::Ticker;

use rust_decimal::Decimal;

use crate::config::{strategy_config, StrategyKind};
use crate::error::StrategyResult;
use crate::mix::{combine, mix_config, StrategyMixConfig};
use crate::strategy::{Strategy, StrategyAssessment};

/// 전략 선택 모드.
#[derive(Debug, Clone)]
pub enum StrategySelection {
    /// 단일 전략
    Single(StrategyKind),
    /// 전략 조합
    Mix(StrategyMixConfig),
    /// 시장 상황 기반 자동 선택
    Auto,
}

/// 전략 실행을 관리하는 매니저.
///
/// 전역 상태 없이 기동 시 설정으로 만들어 명시적으로 전달합니다.
pub struct StrategyManager {
    selection: StrategySelection,
    threshold_override: Option<f64>,
}

impl StrategyManager {
    /// 모드 문자열로 매니저를 만듭니다.
    ///
    /// 지원 형식:
    /// - `"auto"`: 시장 상황 기반 자동 선택
    /// - `"mix:<이름>"` 또는 조합 이름: 전략 조합
    /// - 전략 이름 (예: `"balanced"`): 단일 전략
    pub fn from_mode(mode: &str, threshold_override: Option<f64>) -> StrategyResult<Self> {
        let normalized = mode.trim().to_lowercase();

        let selection = if normalized == "auto" {
            StrategySelection::Auto
        } else if let Some(mix_name) = normalized.strip_prefix("mix:") {
            StrategySelection::Mix(mix_config(mix_name)?)
        } else if let Ok(config) = mix_config(&normalized) {
            StrategySelection::Mix(config)
        } else {
            StrategySelection::Single(normalized.parse()?)
        };

        info!(mode = %normalized, "전략 매니저 초기화");

        Ok(Self {
            selection,
            threshold_override,
        })
    }

    pub fn selection(&self) -> &StrategySelection {
        &self.selection
    }

    /// 현재 선택된 전략으로 분석합니다.
    pub fn analyze(
        &self,
        frame: &IndicatorFrame,
        ticker: &Ticker,
        market_trend: TrendType,
        long_term_trend: TrendType,
    ) -> StrategyResult<StrategyAssessment> {
        match &self.selection {
            StrategySelection::Single(kind) => Ok(self
                .build_strategy(*kind)
                .analyze(frame, ticker, market_trend, long_term_trend)),
            StrategySelection::Mix(config) => {
                self.analyze_mix(config, frame, ticker, market_trend, long_term_trend)
            }
            StrategySelection::Auto => {
                let kind = auto_select_strategy(frame, market_trend);
                debug!(strategy = %kind, "자동 전략 선택");
                Ok(self
                    .build_strategy(kind)
                    .analyze(frame, ticker, market_trend, long_term_trend))
            }
        }
    }

    /// 모든 전략으로 분석합니다 (전략 비교용).
    pub fn analyze_all(
        &self,
        frame: &IndicatorFrame,
        ticker: &Ticker,
        market_trend: TrendType,
        long_term_trend: TrendType,
    ) -> Vec<StrategyAssessment> {
        StrategyKind::ALL
            .iter()
            .map(|kind| {
                self.build_strategy(*kind)
                    .analyze(frame, ticker, market_trend, long_term_trend)
            })
            .collect()
    }

    fn analyze_mix(
        &self,
        config: &StrategyMixConfig,
        frame: &IndicatorFrame,
        ticker: &Ticker,
        market_trend: TrendType,
        long_term_trend: TrendType,
    ) -> StrategyResult<StrategyAssessment> {
        let results: Vec<(StrategyAssessment, f64)> = config
            .members
            .iter()
            .map(|(kind, weight)| {
                let assessment = self
                    .build_strategy(*kind)
                    .analyze(frame, ticker, market_trend, long_term_trend);
                (assessment, *weight)
            })
            .collect();

        combine(config, &results)
    }

    fn build_strategy(&self, kind: StrategyKind) -> Strategy {
        let mut config = strategy_config(kind);
        if let Some(threshold) = self.threshold_override {
            config.signal_threshold = threshold;
        }
        Strategy::from_config(config)
    }
}

/// 시장 상황에 맞는 전략을 고릅니다.
///
/// ATR 변동성 비율과 시장 추세로 시장 상황을 판정한 뒤,
/// 상황별 기본 전략으로 매핑합니다.
pub fn auto_select_strategy(frame: &IndicatorFrame, market_trend: TrendType) -> StrategyKind {
    let ratio = atr_volatility_ratio(frame).unwrap_or(Decimal::ONE);
    let condition = MarketCondition::assess(ratio, market_trend);
    let kind = strategy_for_condition(condition);

    debug!(%condition, strategy = %kind, "시장 상황 기반 전략 선택");
    kind
}

/// 시장 상황별 기본 전략 매핑.
///
/// - 상승장: 모멘텀
/// - 하락장: 보수적
/// - 횡보장: 스캘핑
/// - 고변동성: 스캘핑
/// - 저변동성: 스윙
pub fn strategy_for_condition(condition: MarketCondition) -> StrategyKind {
    match condition {
        MarketCondition::BullMarket => StrategyKind::Momentum,
        MarketCondition::BearMarket => StrategyKind::Conservative,
        MarketCondition::SidewaysMarket | MarketCondition::HighVolatility => StrategyKind::Scalping,
        MarketCondition::LowVolatility => StrategyKind::Swing,
    }
}
