//! 전략 계층 오류 정의.

use signal_analytics::IndicatorError;
use thiserror::Error;

/// 전략 오류.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// 알 수 없는 전략 이름
    #[error("알 수 없는 전략: {0}")]
    UnknownStrategy(String),

    /// 알 수 없는 전략 조합 이름
    #[error("알 수 없는 전략 조합: {0}")]
    UnknownMix(String),

    /// 잘못된 전략 설정
    #[error("잘못된 전략 설정: {0}")]
    InvalidConfig(String),

    /// 지표 계산 오류
    #[error("지표 계산 오류: {0}")]
    Indicator(#[from] IndicatorError),

    /// 분석할 데이터 부족
    #[error("분석 데이터 부족: {0}")]
    InsufficientData(String),
}

/// 전략 계층 결과 타입.
pub type StrategyResult<T> = Result<T, StrategyError>;
