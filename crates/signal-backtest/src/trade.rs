//! 시뮬레이션 거래 기록.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 청산 사유.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// 매도 신호
    Signal,
    /// 손절가 도달
    StopLoss,
    /// 시뮬레이션 종료 시 강제 청산
    EndOfData,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Signal => "signal",
            Self::StopLoss => "stop_loss",
            Self::EndOfData => "end_of_data",
        };
        write!(f, "{}", s)
    }
}

/// 완료된 한 건의 거래 (진입 + 청산).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub ticker: String,
    pub entry_time: DateTime<Utc>,
    pub entry_price: Decimal,
    pub exit_time: DateTime<Utc>,
    pub exit_price: Decimal,
    pub quantity: Decimal,
    /// 수수료 차감 후 손익
    pub pnl: Decimal,
    /// 손익률 (%)
    pub return_pct: f64,
    pub exit_reason: ExitReason,
}

impl TradeRecord {
    /// 수익 거래인지 확인합니다.
    pub fn is_win(&self) -> bool {
        self.pnl > Decimal::ZERO
    }

    /// 보유 기간 (일).
    pub fn holding_days(&self) -> i64 {
        (self.exit_time - self.entry_time).num_days()
    }
}

/// 진입 비용 대비 손익률(%)을 계산합니다.
pub fn return_pct(cost: Decimal, pnl: Decimal) -> f64 {
    if cost <= Decimal::ZERO {
        return 0.0;
    }
    (pnl / cost * Decimal::ONE_HUNDRED)
        .to_f64()
        .unwrap_or(0.0)
}
