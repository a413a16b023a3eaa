//! 백테스트 오류 타입.

use thiserror::Error;

/// 백테스트 오류.
#[derive(Debug, Error)]
pub enum BacktestError {
    /// 설정 오류
    #[error("백테스트 설정 오류: {0}")]
    Config(String),

    /// 데이터 오류
    #[error("데이터 오류: {0}")]
    Data(String),

    /// 지표 계산 오류
    #[error(transparent)]
    Indicator(#[from] signal_analytics::IndicatorError),

    /// 전략 오류
    #[error(transparent)]
    Strategy(#[from] signal_strategy::StrategyError),

    /// 저장소 오류
    #[error(transparent)]
    Store(#[from] signal_data::DataError),
}

pub type Result<T> = std::result::Result<T, BacktestError>;
