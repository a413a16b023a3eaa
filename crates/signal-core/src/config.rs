//! 환경변수 기반 설정 모듈.
//!
//! 전역 인스턴스 없이, 시작 시점에 한 번 로드한 설정 구조체를
//! 하위 컴포넌트에 명시적으로 전달합니다.

use crate::error::{SignalError, SignalResult};

/// 애플리케이션 전체 설정.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 데이터베이스 URL
    pub database_url: String,
    /// 데이터베이스 연결 풀 설정
    pub database: DatabaseConfig,
    /// 전략 선택 모드 (예: "auto", "balanced", "mix:balanced_mix")
    pub strategy_mode: String,
    /// 신호 임계값 오버라이드 (없으면 전략별 기본값 사용)
    pub signal_threshold: Option<f64>,
}

/// 데이터베이스 연결 풀 설정.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
    /// 유휴 타임아웃 (초)
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connection_timeout_secs: 30,
            idle_timeout_secs: 300,
        }
    }
}

impl AppConfig {
    /// 환경변수에서 설정 로드.
    pub fn from_env() -> SignalResult<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL").map_err(|_| {
            SignalError::Config("DATABASE_URL 환경변수가 설정되지 않았습니다".to_string())
        })?;

        Ok(Self {
            database_url,
            database: DatabaseConfig {
                max_connections: env_var_parse("DB_MAX_CONNECTIONS", 10),
                connection_timeout_secs: env_var_parse("DB_CONNECTION_TIMEOUT_SECS", 30),
                idle_timeout_secs: env_var_parse("DB_IDLE_TIMEOUT_SECS", 300),
            },
            strategy_mode: std::env::var("STRATEGY_MODE").unwrap_or_else(|_| "auto".to_string()),
            signal_threshold: std::env::var("SIGNAL_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok()),
        })
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
