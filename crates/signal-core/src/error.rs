//! 신호 시스템의 에러 타입.
//!
//! 이 모듈은 신호 시스템 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 신호 시스템 에러.
#[derive(Debug, Error)]
pub enum SignalError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 지표 계산 에러
    #[error("지표 에러: {0}")]
    Indicator(String),

    /// 전략 에러
    #[error("전략 에러: {0}")]
    Strategy(String),

    /// 데이터 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 신호 시스템 작업을 위한 Result 타입.
pub type SignalResult<T> = Result<T, SignalError>;

impl From<serde_json::Error> for SignalError {
    fn from(err: serde_json::Error) -> Self {
        SignalError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SignalError::Config("DATABASE_URL 누락".to_string());
        assert!(err.to_string().contains("설정 에러"));

        let err = SignalError::NotFound("ticker AAPL".to_string());
        assert!(err.to_string().contains("찾을 수 없음"));
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SignalError = json_err.into();
        assert!(matches!(err, SignalError::Serialization(_)));
    }
}
