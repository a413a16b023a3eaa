//! 기술적 지표 모듈.
//!
//! 신호 감지기가 사용하는 지표 계산기를 제공합니다. 모든 계산기는
//! `Decimal` 시계열을 입력받아 시점별 `Option` 값을 반환합니다
//! (웜업 구간은 `None`).
//!
//! # 지원 지표
//!
//! - **추세**: SMA, EMA, MACD, ADX(+DI/-DI)
//! - **모멘텀**: RSI, Stochastic
//! - **변동성**: Bollinger Bands, ATR
//! - **거래량**: 거래량 SMA, 급증 비율
//! - **가격 레벨**: 피보나치 되돌림

pub mod fibonacci;
pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

use thiserror::Error;

pub use fibonacci::{fibonacci_levels, FibonacciLevels, FibonacciParams};
pub use momentum::{rsi, stochastic, RsiParams, StochasticParams, StochasticResult};
pub use trend::{adx, ema, macd, sma, AdxParams, AdxResult, MacdParams, MacdResult};
pub use volatility::{atr, bandwidth_quantile, bollinger_bands, sqrt_decimal, AtrParams, BollingerBandsParams, BollingerBandsResult};
pub use volume::volume_sma;

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 데이터 부족 오류
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 계산 오류
    #[error("계산 오류: {0}")]
    CalculationError(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 기간 파라미터 공통 검증.
pub(crate) fn check_period(len: usize, period: usize) -> IndicatorResult<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(
            "기간은 0보다 커야 합니다".to_string(),
        ));
    }
    if len < period {
        return Err(IndicatorError::InsufficientData {
            required: period,
            provided: len,
        });
    }
    Ok(())
}
