//! 백테스트 파라미터와 결과.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use signal_data::BacktestRunRecord;

use crate::error::{BacktestError, Result};
use crate::trade::TradeRecord;

/// 백테스트 실행 파라미터.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestParams {
    /// 초기 자본금
    pub initial_capital: Decimal,
    /// 거래 수수료율 (예: 0.001 = 0.1%)
    pub commission_rate: Decimal,
    /// 거래당 허용 리스크 비율 (예: 0.02 = 2%)
    pub risk_per_trade: f64,
}

impl Default for BacktestParams {
    fn default() -> Self {
        Self {
            initial_capital: Decimal::new(10_000_000, 0),
            commission_rate: Decimal::new(1, 3), // 0.1%
            risk_per_trade: 0.02,
        }
    }
}

impl BacktestParams {
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            initial_capital,
            ..Default::default()
        }
    }

    pub fn with_commission_rate(mut self, rate: Decimal) -> Self {
        self.commission_rate = rate;
        self
    }

    pub fn with_risk_per_trade(mut self, risk: f64) -> Self {
        self.risk_per_trade = risk;
        self
    }

    /// 파라미터 검증.
    pub fn validate(&self) -> Result<()> {
        if self.initial_capital <= Decimal::ZERO {
            return Err(BacktestError::Config(
                "초기 자본은 0보다 커야 합니다".to_string(),
            ));
        }
        if self.commission_rate < Decimal::ZERO {
            return Err(BacktestError::Config(
                "수수료율은 0 이상이어야 합니다".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.risk_per_trade) {
            return Err(BacktestError::Config(
                "거래당 리스크는 0과 1 사이여야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}

/// 백테스트 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    pub ticker: String,
    pub strategy: String,
    pub params: BacktestParams,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub final_equity: Decimal,
    /// 총 수익률 (%)
    pub total_return_pct: f64,
    /// 연율화 수익률 (%)
    pub annualized_return_pct: f64,
    /// 최대 낙폭 (%)
    pub max_drawdown_pct: f64,
    /// 승률 (0.0 ~ 1.0)
    pub win_rate: f64,
    pub trade_count: usize,
    pub trades: Vec<TradeRecord>,
}

impl BacktestResult {
    /// 거래 기록과 자산 곡선에서 결과를 계산합니다.
    pub fn from_simulation(
        ticker: &str,
        strategy: &str,
        params: BacktestParams,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        equity_curve: &[Decimal],
        trades: Vec<TradeRecord>,
    ) -> Self {
        let initial = params.initial_capital;
        let final_equity = equity_curve.last().copied().unwrap_or(initial);

        let total_return_pct = if initial > Decimal::ZERO {
            ((final_equity - initial) / initial * Decimal::ONE_HUNDRED)
                .to_f64()
                .unwrap_or(0.0)
        } else {
            0.0
        };

        let days = (end_time - start_time).num_days().max(1) as f64;
        let growth = (final_equity / initial).to_f64().unwrap_or(1.0);
        let annualized_return_pct = if growth > 0.0 {
            (growth.powf(365.0 / days) - 1.0) * 100.0
        } else {
            -100.0
        };

        let wins = trades.iter().filter(|t| t.is_win()).count();
        let win_rate = if trades.is_empty() {
            0.0
        } else {
            wins as f64 / trades.len() as f64
        };

        Self {
            ticker: ticker.to_string(),
            strategy: strategy.to_string(),
            params,
            start_time,
            end_time,
            final_equity,
            total_return_pct,
            annualized_return_pct,
            max_drawdown_pct: max_drawdown_pct(equity_curve),
            win_rate,
            trade_count: trades.len(),
            trades,
        }
    }

    /// 저장용 레코드로 변환합니다.
    pub fn to_record(&self) -> Result<BacktestRunRecord> {
        Ok(BacktestRunRecord {
            id: Uuid::new_v4(),
            ticker: self.ticker.clone(),
            strategy: self.strategy.clone(),
            initial_capital: self.params.initial_capital,
            commission_rate: self.params.commission_rate,
            risk_per_trade: self.params.risk_per_trade,
            final_equity: self.final_equity,
            total_return_pct: self.total_return_pct,
            annualized_return_pct: self.annualized_return_pct,
            max_drawdown_pct: self.max_drawdown_pct,
            win_rate: self.win_rate,
            trade_count: self.trade_count as i32,
            trades: serde_json::to_value(&self.trades)
                .map_err(|e| BacktestError::Data(e.to_string()))?,
            created_at: Utc::now(),
        })
    }
}

/// 자산 곡선에서 최대 낙폭(%)을 계산합니다.
pub fn max_drawdown_pct(equity_curve: &[Decimal]) -> f64 {
    let mut peak = Decimal::ZERO;
    let mut max_drawdown = Decimal::ZERO;

    for &equity in equity_curve {
        if equity > peak {
            peak = equity;
        }
        if peak > Decimal::ZERO {
            let drawdown = (peak - equity) / peak;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }
    }

    (max_drawdown * Decimal::ONE_HUNDRED).to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_params_validation() {
        assert!(BacktestParams::default().validate().is_ok());
        assert!(BacktestParams::new(dec!(-1000)).validate().is_err());
        assert!(BacktestParams::default()
            .with_risk_per_trade(1.5)
            .validate()
            .is_err());
    }

    #[test]
    fn test_max_drawdown() {
        // 100 -> 120 -> 90 -> 110: 낙폭 (120-90)/120 = 25%
        let curve = vec![dec!(100), dec!(120), dec!(90), dec!(110)];
        assert!((max_drawdown_pct(&curve) - 25.0).abs() < 1e-9);

        // 단조 증가면 낙폭 0
        let rising = vec![dec!(100), dec!(110), dec!(120)];
        assert_eq!(max_drawdown_pct(&rising), 0.0);
    }

    #[test]
    fn test_result_metrics() {
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let params = BacktestParams::new(dec!(10000));
        let curve = vec![dec!(10000), dec!(10500), dec!(11000)];

        let result = BacktestResult::from_simulation(
            "AAPL", "balanced", params, start, end, &curve, vec![],
        );

        assert!((result.total_return_pct - 10.0).abs() < 1e-6);
        // 1년이므로 연율화 수익률과 총 수익률이 거의 같음
        assert!((result.annualized_return_pct - 10.0).abs() < 0.2);
        assert_eq!(result.trade_count, 0);
        assert_eq!(result.win_rate, 0.0);
    }
}
