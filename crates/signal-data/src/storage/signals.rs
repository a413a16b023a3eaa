//! 매매 신호 저장소.
//!
//! 확정된 신호를 근거(JSONB)와 함께 기록하고, 종목/전략별 최근 신호를
//! 조회합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use tracing::{info, instrument};
use uuid::Uuid;

use signal_core::domain::{SignalAction, SignalEvidence, SignalStrength, TradingSignal};
use signal_core::types::Ticker;

use crate::error::{DataError, Result};

/// 매매 신호 데이터베이스 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct SignalRecord {
    pub id: Uuid,
    pub ticker: String,
    pub action: String,
    pub strategy: String,
    pub score: f64,
    pub strength: String,
    pub confidence: f64,
    pub price: Decimal,
    pub stop_loss: Option<Decimal>,
    pub evidence: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl SignalRecord {
    /// 도메인 신호에서 레코드를 만듭니다.
    pub fn from_signal(signal: &TradingSignal) -> Result<Self> {
        Ok(Self {
            id: signal.id,
            ticker: signal.ticker.as_str().to_string(),
            action: signal.action.to_string(),
            strategy: signal.strategy.clone(),
            score: signal.total_score,
            strength: signal.strength.to_string(),
            confidence: signal.confidence,
            price: signal.price,
            stop_loss: signal.stop_loss,
            evidence: serde_json::to_value(&signal.evidence)?,
            created_at: signal.timestamp,
        })
    }

    /// 도메인 신호로 복원합니다.
    pub fn to_signal(&self) -> Result<TradingSignal> {
        let action = match self.action.as_str() {
            "BUY" => SignalAction::Buy,
            "SELL" => SignalAction::Sell,
            "NEUTRAL" => SignalAction::Neutral,
            other => {
                return Err(DataError::InvalidData(format!(
                    "알 수 없는 신호 방향: {other}"
                )))
            }
        };
        let evidence: Vec<SignalEvidence> = serde_json::from_value(self.evidence.clone())?;

        let mut signal = TradingSignal::new(
            Ticker::new(&self.ticker),
            action,
            self.strategy.clone(),
            self.score,
            self.price,
        )
        .with_evidence(evidence)
        .with_timestamp(self.created_at);
        signal.id = self.id;
        if let Some(stop) = self.stop_loss {
            signal = signal.with_stop_loss(stop);
        }

        Ok(signal)
    }
}

/// 매매 신호 저장소.
#[derive(Clone)]
pub struct SignalStore {
    pool: PgPool,
}

impl SignalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 신호를 저장합니다.
    ///
    /// 같은 ID로 다시 저장하면 `DataError::Duplicate`입니다.
    #[instrument(skip(self, signal), fields(ticker = %signal.ticker, strategy = %signal.strategy))]
    pub async fn save(&self, signal: &TradingSignal) -> Result<()> {
        let record = SignalRecord::from_signal(signal)?;

        sqlx::query(
            r#"
            INSERT INTO trading_signals
                (id, ticker, action, strategy, score, strength, confidence,
                 price, stop_loss, evidence, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(record.id)
        .bind(&record.ticker)
        .bind(&record.action)
        .bind(&record.strategy)
        .bind(record.score)
        .bind(&record.strength)
        .bind(record.confidence)
        .bind(record.price)
        .bind(record.stop_loss)
        .bind(&record.evidence)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        info!(action = %signal.action, score = signal.total_score, "신호 저장");
        Ok(())
    }

    /// 종목의 최근 신호를 조회합니다.
    pub async fn recent_by_ticker(
        &self,
        ticker: &Ticker,
        limit: usize,
    ) -> Result<Vec<SignalRecord>> {
        let records = sqlx::query_as(
            r#"
            SELECT id, ticker, action, strategy, score, strength, confidence,
                   price, stop_loss, evidence, created_at
            FROM trading_signals
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

    /// 전략의 최근 신호를 조회합니다.
    pub async fn recent_by_strategy(
        &self,
        strategy: &str,
        limit: usize,
    ) -> Result<Vec<SignalRecord>> {
        let records = sqlx::query_as(
            r#"
            SELECT id, ticker, action, strategy, score, strength, confidence,
                   price, stop_loss, evidence, created_at
            FROM trading_signals
            WHERE strategy = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(strategy)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// ID로 신호를 조회합니다.
    pub async fn find_by_id(&self, id: Uuid) -> Result<SignalRecord> {
        let record = sqlx::query_as(
            r#"
            SELECT id, ticker, action, strategy, score, strength, confidence,
                   price, stop_loss, evidence, created_at
            FROM trading_signals
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_signal() -> TradingSignal {
        TradingSignal::buy(Ticker::new("AAPL"), "balanced", 11.5, dec!(185.20))
            .with_stop_loss(dec!(179.00))
            .with_evidence(vec![SignalEvidence::new("sma_cross", 3.0, 0.0)
                .with_detail("골든 크로스 발생")])
    }

    #[test]
    fn test_record_round_trip() {
        let signal = sample_signal();
        let record = SignalRecord::from_signal(&signal).unwrap();

        assert_eq!(record.action, "BUY");
        assert_eq!(record.strength, SignalStrength::Strong.to_string());

        let restored = record.to_signal().unwrap();
        assert_eq!(restored.id, signal.id);
        assert_eq!(restored.action, SignalAction::Buy);
        assert_eq!(restored.stop_loss, Some(dec!(179.00)));
        assert_eq!(restored.evidence.len(), 1);
        assert_eq!(restored.timestamp, signal.timestamp);
    }

    #[test]
    fn test_unknown_action_is_invalid_data() {
        let signal = sample_signal();
        let mut record = SignalRecord::from_signal(&signal).unwrap();
        record.action = "HOLD".to_string();

        assert!(matches!(
            record.to_signal(),
            Err(DataError::InvalidData(_))
        ));
    }
}
