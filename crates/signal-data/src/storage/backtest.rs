//! 백테스트 실행 기록 저장소.
//!
//! 실행 파라미터와 결과 요약, 개별 거래 로그(JSONB)를 함께 기록합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use tracing::{info, instrument};
use uuid::Uuid;

use signal_core::types::Ticker;

use crate::error::Result;

/// 백테스트 실행 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct BacktestRunRecord {
    pub id: Uuid,
    pub ticker: String,
    pub strategy: String,
    pub initial_capital: Decimal,
    pub commission_rate: Decimal,
    pub risk_per_trade: f64,
    pub final_equity: Decimal,
    pub total_return_pct: f64,
    pub annualized_return_pct: f64,
    pub max_drawdown_pct: f64,
    pub win_rate: f64,
    pub trade_count: i32,
    pub trades: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// 백테스트 기록 저장소.
#[derive(Clone)]
pub struct BacktestStore {
    pool: PgPool,
}

impl BacktestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 실행 기록을 저장합니다.
    #[instrument(skip(self, record), fields(ticker = %record.ticker, strategy = %record.strategy))]
    pub async fn save(&self, record: &BacktestRunRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO backtest_runs
                (id, ticker, strategy, initial_capital, commission_rate, risk_per_trade,
                 final_equity, total_return_pct, annualized_return_pct, max_drawdown_pct,
                 win_rate, trade_count, trades, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(record.id)
        .bind(&record.ticker)
        .bind(&record.strategy)
        .bind(record.initial_capital)
        .bind(record.commission_rate)
        .bind(record.risk_per_trade)
        .bind(record.final_equity)
        .bind(record.total_return_pct)
        .bind(record.annualized_return_pct)
        .bind(record.max_drawdown_pct)
        .bind(record.win_rate)
        .bind(record.trade_count)
        .bind(&record.trades)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        info!(
            total_return_pct = record.total_return_pct,
            trade_count = record.trade_count,
            "백테스트 기록 저장"
        );
        Ok(())
    }

    /// 종목의 최근 실행 기록을 조회합니다.
    pub async fn recent_by_ticker(
        &self,
        ticker: &Ticker,
        limit: usize,
    ) -> Result<Vec<BacktestRunRecord>> {
        let records = sqlx::query_as(
            r#"
            SELECT id, ticker, strategy, initial_capital, commission_rate, risk_per_trade,
                   final_equity, total_return_pct, annualized_return_pct, max_drawdown_pct,
                   win_rate, trade_count, trades, created_at
            FROM backtest_runs
            WHERE ticker = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(ticker.as_str())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// ID로 실행 기록을 조회합니다.
    pub async fn find_by_id(&self, id: Uuid) -> Result<BacktestRunRecord> {
        let record = sqlx::query_as(
            r#"
            SELECT id, ticker, strategy, initial_capital, commission_rate, risk_per_trade,
                   final_equity, total_return_pct, annualized_return_pct, max_drawdown_pct,
                   win_rate, trade_count, trades, created_at
            FROM backtest_runs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }
}
