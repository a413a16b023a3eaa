//! 캔들 데이터 소스 추상화.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use signal_core::domain::Kline;
use signal_core::types::{Ticker, Timeframe};

use crate::error::Result;

/// 캔들 시계열을 제공하는 소스.
///
/// 저장소 구현과 분석/백테스트 코드를 분리하기 위한 경계입니다.
/// 테스트에서는 인메모리 구현으로 대체할 수 있습니다.
#[async_trait]
pub trait BarSource: Send + Sync {
    /// 최신 `limit`개의 캔들을 시간 오름차순으로 반환합니다.
    async fn bars(
        &self,
        ticker: &Ticker,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Kline>>;

    /// `[start, end)` 범위의 캔들을 시간 오름차순으로 반환합니다.
    async fn bars_between(
        &self,
        ticker: &Ticker,
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Kline>>;
}
