//! # Signal Strategy
//!
//! 신호 감지기, 전략, 전략 조합을 제공합니다.
//!
//! - 감지기: 지표 프레임에서 개별 매수/매도 근거를 점수로 감지
//! - 오케스트레이터: 감지기 점수 합산과 추세 필터로 최종 신호 판정
//! - 전략: 감지기 구성 + 임계값 + 리스크 설정
//! - 전략 조합: 가중/투표/앙상블 방식의 결과 합성
//! - 매니저: 기동 설정 기반 전략 선택 및 자동 선택

pub mod adjustment;
pub mod config;
pub mod detectors;
pub mod error;
pub mod manager;
pub mod mix;
pub mod orchestrator;
pub mod strategy;

pub use adjustment::AdjustmentFactors;
pub use config::{strategy_config, StrategyConfig, StrategyKind};
pub use detectors::{DetectorContext, DetectorSpec, SignalDetector};
pub use error::{StrategyError, StrategyResult};
pub use manager::{auto_select_strategy, strategy_for_condition, StrategyManager, StrategySelection};
pub use mix::{available_mixes, combine, mix_config, MixMode, StrategyMixConfig};
pub use orchestrator::{stop_loss, ScoreBreakdown, SignalOrchestrator};
pub use strategy::{Strategy, StrategyAssessment};
