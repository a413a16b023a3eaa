//! # Signal Data
//!
//! Postgres 기반 영속 계층을 제공합니다:
//! - OHLCV 캔들 저장/조회 (UNNEST 일괄 업서트)
//! - 기술적 지표 스냅샷
//! - 매매 신호 기록 (근거 JSONB 포함)
//! - 거시 지표 (VIX, 버핏 지수)
//! - 백테스트 실행 기록

pub mod db;
pub mod error;
pub mod source;
pub mod storage;

pub use db::Database;
pub use error::{DataError, Result};
pub use source::BarSource;

// 저장소 타입 재내보내기
pub use storage::backtest::{BacktestRunRecord, BacktestStore};
pub use storage::indicators::{IndicatorSnapshot, IndicatorStore};
pub use storage::market::{MarketIndicatorRecord, MarketIndicatorStore};
pub use storage::ohlcv::{OhlcvRecord, OhlcvStore};
pub use storage::signals::{SignalRecord, SignalStore};
