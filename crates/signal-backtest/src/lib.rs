//! # Signal Backtest
//!
//! 과거 캔들로 전략과 전략 조합을 시뮬레이션합니다.
//!
//! - 엔진: 캔들 단위 시뮬레이션 (손절 우선, 미래 참조 방지)
//! - 포트폴리오: 리스크 기반 포지션 크기, 수수료 추적
//! - 결과: 수익률, 최대 낙폭, 승률 등의 지표
//! - 서비스: 저장소 연동 실행 및 기록

pub mod engine;
pub mod error;
pub mod portfolio;
pub mod result;
pub mod service;
pub mod trade;

pub use engine::BacktestEngine;
pub use error::{BacktestError, Result};
pub use portfolio::{OpenPosition, Portfolio};
pub use result::{max_drawdown_pct, BacktestParams, BacktestResult};
pub use service::BacktestService;
pub use trade::{ExitReason, TradeRecord};
