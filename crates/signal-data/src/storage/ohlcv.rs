//! OHLCV 캔들 저장소.
//!
//! 분석과 백테스트에서 공통으로 사용하는 캔들 데이터를 저장하고
//! 조회합니다. 중복 저장은 ON CONFLICT 업서트로 처리합니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use tracing::{debug, info, instrument};

use signal_core::domain::Kline;
use signal_core::types::{Ticker, Timeframe};

use crate::error::Result;
use crate::source::BarSource;

/// OHLCV 캔들 데이터베이스 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct OhlcvRecord {
    pub ticker: String,
    pub timeframe: String,
    pub ts: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl OhlcvRecord {
    /// Kline 도메인 객체로 변환.
    pub fn to_kline(&self) -> Kline {
        let timeframe = Timeframe::from_interval(&self.timeframe).unwrap_or(Timeframe::D1);
        Kline::new(
            Ticker::new(&self.ticker),
            timeframe,
            self.ts,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        )
    }
}

/// OHLCV 캔들 저장소.
#[derive(Clone)]
pub struct OhlcvStore {
    pool: PgPool,
}

impl OhlcvStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 최신 `limit`개의 캔들을 시간 오름차순으로 조회합니다.
    #[instrument(skip(self))]
    pub async fn latest_bars(
        &self,
        ticker: &Ticker,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Kline>> {
        let records: Vec<OhlcvRecord> = sqlx::query_as(
            r#"
            SELECT ticker, timeframe, ts, open, high, low, close, volume, fetched_at
            FROM ohlcv_bars
            WHERE ticker = $1 AND timeframe = $2
            ORDER BY ts DESC
            LIMIT $3
            "#,
        )
        .bind(ticker.as_str())
        .bind(timeframe.to_interval())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        // 시간순 정렬 (오래된 것부터)
        let mut klines: Vec<Kline> = records.into_iter().map(|r| r.to_kline()).collect();
        klines.reverse();

        debug!(
            ticker = %ticker,
            timeframe = timeframe.to_interval(),
            count = klines.len(),
            "캔들 조회"
        );

        Ok(klines)
    }

    /// 특정 시간 범위의 캔들을 조회합니다.
    #[instrument(skip(self))]
    pub async fn bars_in_range(
        &self,
        ticker: &Ticker,
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Kline>> {
        let records: Vec<OhlcvRecord> = sqlx::query_as(
            r#"
            SELECT ticker, timeframe, ts, open, high, low, close, volume, fetched_at
            FROM ohlcv_bars
            WHERE ticker = $1 AND timeframe = $2 AND ts >= $3 AND ts < $4
            ORDER BY ts ASC
            "#,
        )
        .bind(ticker.as_str())
        .bind(timeframe.to_interval())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(|r| r.to_kline()).collect())
    }

    /// 캔들 데이터를 일괄 저장합니다.
    ///
    /// UNNEST 패턴으로 한 번에 삽입하고, 중복 시점은 덮어씁니다.
    #[instrument(skip(self, klines), fields(count = klines.len()))]
    pub async fn save_bars(&self, klines: &[Kline]) -> Result<usize> {
        if klines.is_empty() {
            return Ok(0);
        }

        let mut inserted = 0;

        for chunk in klines.chunks(500) {
            let tickers: Vec<&str> = chunk.iter().map(|k| k.ticker.as_str()).collect();
            let timeframes: Vec<&str> = chunk.iter().map(|k| k.timeframe.to_interval()).collect();
            let timestamps: Vec<DateTime<Utc>> = chunk.iter().map(|k| k.open_time).collect();
            let opens: Vec<Decimal> = chunk.iter().map(|k| k.open).collect();
            let highs: Vec<Decimal> = chunk.iter().map(|k| k.high).collect();
            let lows: Vec<Decimal> = chunk.iter().map(|k| k.low).collect();
            let closes: Vec<Decimal> = chunk.iter().map(|k| k.close).collect();
            let volumes: Vec<Decimal> = chunk.iter().map(|k| k.volume).collect();

            let result = sqlx::query(
                r#"
                INSERT INTO ohlcv_bars
                    (ticker, timeframe, ts, open, high, low, close, volume, fetched_at)
                SELECT * FROM UNNEST(
                    $1::text[], $2::text[], $3::timestamptz[],
                    $4::numeric[], $5::numeric[], $6::numeric[], $7::numeric[], $8::numeric[]
                ), NOW()
                ON CONFLICT (ticker, timeframe, ts) DO UPDATE SET
                    high = GREATEST(ohlcv_bars.high, EXCLUDED.high),
                    low = LEAST(ohlcv_bars.low, EXCLUDED.low),
                    close = EXCLUDED.close,
                    volume = EXCLUDED.volume,
                    fetched_at = NOW()
                "#,
            )
            .bind(&tickers)
            .bind(&timeframes)
            .bind(&timestamps)
            .bind(&opens)
            .bind(&highs)
            .bind(&lows)
            .bind(&closes)
            .bind(&volumes)
            .execute(&self.pool)
            .await?;

            inserted += result.rows_affected() as usize;
        }

        info!(inserted = inserted, "캔들 데이터 저장");

        Ok(inserted)
    }

    /// 가장 최근 캔들의 시간을 조회합니다.
    ///
    /// 증분 업데이트 시 시작점 결정에 사용.
    pub async fn last_bar_time(
        &self,
        ticker: &Ticker,
        timeframe: Timeframe,
    ) -> Result<Option<DateTime<Utc>>> {
        let result: Option<(DateTime<Utc>,)> = sqlx::query_as(
            r#"
            SELECT ts FROM ohlcv_bars
            WHERE ticker = $1 AND timeframe = $2
            ORDER BY ts DESC
            LIMIT 1
            "#,
        )
        .bind(ticker.as_str())
        .bind(timeframe.to_interval())
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.map(|(t,)| t))
    }

    /// 저장된 캔들 수를 조회합니다.
    pub async fn bar_count(&self, ticker: &Ticker, timeframe: Timeframe) -> Result<i64> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM ohlcv_bars
            WHERE ticker = $1 AND timeframe = $2
            "#,
        )
        .bind(ticker.as_str())
        .bind(timeframe.to_interval())
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// 특정 종목의 모든 캔들을 삭제합니다.
    pub async fn delete_ticker(&self, ticker: &Ticker) -> Result<u64> {
        let result = sqlx::query("DELETE FROM ohlcv_bars WHERE ticker = $1")
            .bind(ticker.as_str())
            .execute(&self.pool)
            .await?;

        info!(ticker = %ticker, deleted = result.rows_affected(), "종목 캔들 삭제");
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl BarSource for OhlcvStore {
    async fn bars(
        &self,
        ticker: &Ticker,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Kline>> {
        self.latest_bars(ticker, timeframe, limit).await
    }

    async fn bars_between(
        &self,
        ticker: &Ticker,
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Kline>> {
        self.bars_in_range(ticker, timeframe, start, end).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_record_to_kline() {
        let record = OhlcvRecord {
            ticker: "AAPL".to_string(),
            timeframe: "1d".to_string(),
            ts: Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap(),
            open: dec!(180.0),
            high: dec!(185.5),
            low: dec!(179.2),
            close: dec!(184.1),
            volume: dec!(52000000),
            fetched_at: None,
        };

        let kline = record.to_kline();
        assert_eq!(kline.ticker.as_str(), "AAPL");
        assert_eq!(kline.timeframe, Timeframe::D1);
        assert_eq!(kline.close, dec!(184.1));
    }

    #[test]
    fn test_unknown_timeframe_falls_back_to_daily() {
        let record = OhlcvRecord {
            ticker: "AAPL".to_string(),
            timeframe: "7d".to_string(),
            ts: Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap(),
            open: dec!(1),
            high: dec!(1),
            low: dec!(1),
            close: dec!(1),
            volume: dec!(1),
            fetched_at: None,
        };

        assert_eq!(record.to_kline().timeframe, Timeframe::D1);
    }
}
