//! # Signal Core
//!
//! 주식 신호 봇의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 티커 및 타임프레임 정의
//! - OHLCV 캔들 구조체
//! - 추세/매매 신호 타입
//! - 시장 지표 종류 정의
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
