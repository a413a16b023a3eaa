//! 거시 지표 저장소.
//!
//! VIX, 버핏 지수 같은 일 단위 거시 지표를 (지표, 날짜) 키로 저장합니다.
//! 거시 심리 분석(`signal-analytics`)의 입력을 제공합니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use tracing::{debug, instrument};

use signal_core::domain::MarketIndicatorKind;

use crate::error::Result;

/// 거시 지표 데이터베이스 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct MarketIndicatorRecord {
    pub indicator: String,
    pub date: NaiveDate,
    pub value: Decimal,
}

/// 거시 지표 저장소.
#[derive(Clone)]
pub struct MarketIndicatorStore {
    pool: PgPool,
}

impl MarketIndicatorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 지표 값을 저장합니다. 같은 날짜는 덮어씁니다.
    #[instrument(skip(self))]
    pub async fn save(
        &self,
        kind: MarketIndicatorKind,
        date: NaiveDate,
        value: Decimal,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO market_indicators (indicator, date, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (indicator, date) DO UPDATE SET value = EXCLUDED.value
            "#,
        )
        .bind(kind.as_str())
        .bind(date)
        .bind(value)
        .execute(&self.pool)
        .await?;

        debug!(indicator = kind.as_str(), %date, %value, "거시 지표 저장");
        Ok(())
    }

    /// 가장 최근 값을 조회합니다.
    pub async fn latest(
        &self,
        kind: MarketIndicatorKind,
    ) -> Result<Option<MarketIndicatorRecord>> {
        let record = sqlx::query_as(
            r#"
            SELECT indicator, date, value
            FROM market_indicators
            WHERE indicator = $1
            ORDER BY date DESC
            LIMIT 1
            "#,
        )
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// 특정 날짜 이전(포함)의 가장 최근 값을 조회합니다.
    ///
    /// 휴장일에는 그 직전 거래일 값이 나옵니다. VIX 3일 변화율 계산에
    /// 사용합니다.
    pub async fn as_of(
        &self,
        kind: MarketIndicatorKind,
        date: NaiveDate,
    ) -> Result<Option<MarketIndicatorRecord>> {
        let record = sqlx::query_as(
            r#"
            SELECT indicator, date, value
            FROM market_indicators
            WHERE indicator = $1 AND date <= $2
            ORDER BY date DESC
            LIMIT 1
            "#,
        )
        .bind(kind.as_str())
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// 날짜 범위의 값들을 조회합니다.
    pub async fn range(
        &self,
        kind: MarketIndicatorKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MarketIndicatorRecord>> {
        let records = sqlx::query_as(
            r#"
            SELECT indicator, date, value
            FROM market_indicators
            WHERE indicator = $1 AND date >= $2 AND date <= $3
            ORDER BY date ASC
            "#,
        )
        .bind(kind.as_str())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
