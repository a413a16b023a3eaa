//! 시뮬레이션 포트폴리오.
//!
//! 단일 종목, 단일 포지션 모델입니다. 진입 크기는 거래당 허용 리스크
//! (진입가와 손절가의 거리)로 결정합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::trade::{return_pct, ExitReason, TradeRecord};

/// 보유 중인 포지션.
#[derive(Debug, Clone)]
pub struct OpenPosition {
    pub quantity: Decimal,
    pub entry_price: Decimal,
    pub entry_time: DateTime<Utc>,
    pub stop_loss: Decimal,
    /// 수수료 포함 진입 비용
    pub cost: Decimal,
}

/// 현금, 포지션, 수수료를 추적하는 포트폴리오.
#[derive(Debug)]
pub struct Portfolio {
    cash: Decimal,
    commission_rate: Decimal,
    risk_per_trade: f64,
    position: Option<OpenPosition>,
    trades: Vec<TradeRecord>,
}

impl Portfolio {
    pub fn new(initial_capital: Decimal, commission_rate: Decimal, risk_per_trade: f64) -> Self {
        Self {
            cash: initial_capital,
            commission_rate,
            risk_per_trade,
            position: None,
            trades: Vec::new(),
        }
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn position(&self) -> Option<&OpenPosition> {
        self.position.as_ref()
    }

    pub fn has_position(&self) -> bool {
        self.position.is_some()
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn into_trades(self) -> Vec<TradeRecord> {
        self.trades
    }

    /// 현재 자산 가치 (현금 + 보유 포지션 평가액).
    pub fn equity(&self, current_price: Decimal) -> Decimal {
        let position_value = self
            .position
            .as_ref()
            .map(|p| p.quantity * current_price)
            .unwrap_or(Decimal::ZERO);
        self.cash + position_value
    }

    /// 리스크 기반 포지션 크기를 계산합니다.
    ///
    /// 진입가와 손절가의 거리로 허용 손실액을 나눕니다. 현금으로 살 수
    /// 있는 수량을 넘지 않습니다.
    fn position_size(&self, price: Decimal, stop_loss: Decimal) -> Decimal {
        let stop_distance = price - stop_loss;
        if stop_distance <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let risk_amount = self.cash
            * Decimal::try_from(self.risk_per_trade).unwrap_or(Decimal::ZERO);
        let risk_based = risk_amount / stop_distance;

        // 수수료 포함 매수 가능 수량 상한
        let unit_cost = price * (Decimal::ONE + self.commission_rate);
        let affordable = if unit_cost > Decimal::ZERO {
            self.cash / unit_cost
        } else {
            Decimal::ZERO
        };

        risk_based.min(affordable)
    }

    /// 포지션을 엽니다. 이미 포지션이 있거나 크기가 0이면 무시합니다.
    pub fn open(
        &mut self,
        price: Decimal,
        stop_loss: Decimal,
        time: DateTime<Utc>,
    ) -> bool {
        if self.position.is_some() {
            return false;
        }

        let quantity = self.position_size(price, stop_loss);
        if quantity <= Decimal::ZERO {
            return false;
        }

        let cost = quantity * price * (Decimal::ONE + self.commission_rate);
        if cost > self.cash {
            return false;
        }

        self.cash -= cost;
        self.position = Some(OpenPosition {
            quantity,
            entry_price: price,
            entry_time: time,
            stop_loss,
            cost,
        });

        debug!(%price, %quantity, %stop_loss, "포지션 진입");
        true
    }

    /// 포지션을 청산하고 거래를 기록합니다.
    pub fn close(
        &mut self,
        ticker: &str,
        price: Decimal,
        time: DateTime<Utc>,
        reason: ExitReason,
    ) -> Option<&TradeRecord> {
        let position = self.position.take()?;

        let proceeds = position.quantity * price * (Decimal::ONE - self.commission_rate);
        self.cash += proceeds;

        let pnl = proceeds - position.cost;
        let trade = TradeRecord {
            ticker: ticker.to_string(),
            entry_time: position.entry_time,
            entry_price: position.entry_price,
            exit_time: time,
            exit_price: price,
            quantity: position.quantity,
            pnl,
            return_pct: return_pct(position.cost, pnl),
            exit_reason: reason,
        };

        debug!(%price, pnl = %trade.pnl, reason = %reason, "포지션 청산");
        self.trades.push(trade);
        self.trades.last()
    }
}
