//! 기술적 지표 스냅샷 저장소.
//!
//! 지표 프레임의 한 행을 그대로 저장해 사후 분석과 디버깅에 씁니다.
//! (ticker, ts, timeframe) 복합 키로 중복 저장 시 덮어씁니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use tracing::{debug, instrument};

use signal_analytics::frame::{columns, IndicatorFrame};
use signal_core::types::{Ticker, Timeframe};

use crate::error::Result;

/// 한 시점의 지표 스냅샷.
#[derive(Debug, Clone, FromRow)]
pub struct IndicatorSnapshot {
    pub ticker: String,
    pub ts: DateTime<Utc>,
    pub timeframe: String,
    pub sma_5: Option<Decimal>,
    pub sma_20: Option<Decimal>,
    pub sma_60: Option<Decimal>,
    pub rsi_14: Option<Decimal>,
    pub macd_line: Option<Decimal>,
    pub macd_signal: Option<Decimal>,
    pub macd_histogram: Option<Decimal>,
    pub stoch_k: Option<Decimal>,
    pub stoch_d: Option<Decimal>,
    pub bb_upper: Option<Decimal>,
    pub bb_middle: Option<Decimal>,
    pub bb_lower: Option<Decimal>,
    pub atr_14: Option<Decimal>,
    pub adx_14: Option<Decimal>,
    pub plus_di: Option<Decimal>,
    pub minus_di: Option<Decimal>,
    pub volume_sma_20: Option<Decimal>,
}

impl IndicatorSnapshot {
    /// 지표 프레임의 `index` 행에서 스냅샷을 만듭니다.
    ///
    /// 범위 밖 인덱스면 `None`을 반환합니다.
    pub fn from_frame(frame: &IndicatorFrame, index: usize) -> Option<Self> {
        let bar = frame.bars().get(index)?;

        Some(Self {
            ticker: bar.ticker.as_str().to_string(),
            ts: bar.open_time,
            timeframe: bar.timeframe.to_interval().to_string(),
            sma_5: frame.value_at(columns::SMA_SHORT, index),
            sma_20: frame.value_at(columns::SMA_MID, index),
            sma_60: frame.value_at(columns::SMA_LONG, index),
            rsi_14: frame.value_at(columns::RSI, index),
            macd_line: frame.value_at(columns::MACD_LINE, index),
            macd_signal: frame.value_at(columns::MACD_SIGNAL, index),
            macd_histogram: frame.value_at(columns::MACD_HISTOGRAM, index),
            stoch_k: frame.value_at(columns::STOCH_K, index),
            stoch_d: frame.value_at(columns::STOCH_D, index),
            bb_upper: frame.value_at(columns::BB_UPPER, index),
            bb_middle: frame.value_at(columns::BB_MIDDLE, index),
            bb_lower: frame.value_at(columns::BB_LOWER, index),
            atr_14: frame.value_at(columns::ATR, index),
            adx_14: frame.value_at(columns::ADX, index),
            plus_di: frame.value_at(columns::PLUS_DI, index),
            minus_di: frame.value_at(columns::MINUS_DI, index),
            volume_sma_20: frame.value_at(columns::VOLUME_SMA, index),
        })
    }

    /// 지표 프레임의 마지막 행에서 스냅샷을 만듭니다.
    pub fn latest_from_frame(frame: &IndicatorFrame) -> Option<Self> {
        if frame.is_empty() {
            return None;
        }
        Self::from_frame(frame, frame.len() - 1)
    }
}

/// 지표 스냅샷 저장소.
#[derive(Clone)]
pub struct IndicatorStore {
    pool: PgPool,
}

impl IndicatorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 스냅샷을 저장합니다. 같은 키가 있으면 덮어씁니다.
    #[instrument(skip(self, snapshot), fields(ticker = %snapshot.ticker, ts = %snapshot.ts))]
    pub async fn save(&self, snapshot: &IndicatorSnapshot) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO technical_indicators
                (ticker, ts, timeframe,
                 sma_5, sma_20, sma_60, rsi_14,
                 macd_line, macd_signal, macd_histogram,
                 stoch_k, stoch_d,
                 bb_upper, bb_middle, bb_lower,
                 atr_14, adx_14, plus_di, minus_di, volume_sma_20)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            ON CONFLICT (ticker, ts, timeframe) DO UPDATE SET
                sma_5 = EXCLUDED.sma_5,
                sma_20 = EXCLUDED.sma_20,
                sma_60 = EXCLUDED.sma_60,
                rsi_14 = EXCLUDED.rsi_14,
                macd_line = EXCLUDED.macd_line,
                macd_signal = EXCLUDED.macd_signal,
                macd_histogram = EXCLUDED.macd_histogram,
                stoch_k = EXCLUDED.stoch_k,
                stoch_d = EXCLUDED.stoch_d,
                bb_upper = EXCLUDED.bb_upper,
                bb_middle = EXCLUDED.bb_middle,
                bb_lower = EXCLUDED.bb_lower,
                atr_14 = EXCLUDED.atr_14,
                adx_14 = EXCLUDED.adx_14,
                plus_di = EXCLUDED.plus_di,
                minus_di = EXCLUDED.minus_di,
                volume_sma_20 = EXCLUDED.volume_sma_20
            "#,
        )
        .bind(&snapshot.ticker)
        .bind(snapshot.ts)
        .bind(&snapshot.timeframe)
        .bind(snapshot.sma_5)
        .bind(snapshot.sma_20)
        .bind(snapshot.sma_60)
        .bind(snapshot.rsi_14)
        .bind(snapshot.macd_line)
        .bind(snapshot.macd_signal)
        .bind(snapshot.macd_histogram)
        .bind(snapshot.stoch_k)
        .bind(snapshot.stoch_d)
        .bind(snapshot.bb_upper)
        .bind(snapshot.bb_middle)
        .bind(snapshot.bb_lower)
        .bind(snapshot.atr_14)
        .bind(snapshot.adx_14)
        .bind(snapshot.plus_di)
        .bind(snapshot.minus_di)
        .bind(snapshot.volume_sma_20)
        .execute(&self.pool)
        .await?;

        debug!("지표 스냅샷 저장");
        Ok(())
    }

    /// 특정 시점의 스냅샷을 조회합니다.
    pub async fn find(
        &self,
        ticker: &Ticker,
        ts: DateTime<Utc>,
        timeframe: Timeframe,
    ) -> Result<Option<IndicatorSnapshot>> {
        let snapshot = sqlx::query_as(
            r#"
            SELECT ticker, ts, timeframe,
                   sma_5, sma_20, sma_60, rsi_14,
                   macd_line, macd_signal, macd_histogram,
                   stoch_k, stoch_d,
                   bb_upper, bb_middle, bb_lower,
                   atr_14, adx_14, plus_di, minus_di, volume_sma_20
            FROM technical_indicators
            WHERE ticker = $1 AND ts = $2 AND timeframe = $3
            "#,
        )
        .bind(ticker.as_str())
        .bind(ts)
        .bind(timeframe.to_interval())
        .fetch_optional(&self.pool)
        .await?;

        Ok(snapshot)
    }

    /// 최신 스냅샷을 조회합니다.
    pub async fn latest(
        &self,
        ticker: &Ticker,
        timeframe: Timeframe,
    ) -> Result<Option<IndicatorSnapshot>> {
        let snapshot = sqlx::query_as(
            r#"
            SELECT ticker, ts, timeframe,
                   sma_5, sma_20, sma_60, rsi_14,
                   macd_line, macd_signal, macd_histogram,
                   stoch_k, stoch_d,
                   bb_upper, bb_middle, bb_lower,
                   atr_14, adx_14, plus_di, minus_di, volume_sma_20
            FROM technical_indicators
            WHERE ticker = $1 AND timeframe = $2
            ORDER BY ts DESC
            LIMIT 1
            "#,
        )
        .bind(ticker.as_str())
        .bind(timeframe.to_interval())
        .fetch_optional(&self.pool)
        .await?;

        Ok(snapshot)
    }
}
