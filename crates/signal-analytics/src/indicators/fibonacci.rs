//! 피보나치 되돌림 레벨.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// 피보나치 파라미터.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FibonacciParams {
    /// 고점/저점 탐색 기간 (기본: 200일)
    pub lookback: usize,
    /// 되돌림 레벨 (%, 기본: 0 / 23.6 / 38.2 / 50 / 61.8 / 100)
    pub levels: Vec<Decimal>,
}

impl Default for FibonacciParams {
    fn default() -> Self {
        Self {
            lookback: 200,
            levels: vec![
                dec!(0),
                dec!(23.6),
                dec!(38.2),
                dec!(50),
                dec!(61.8),
                dec!(100),
            ],
        }
    }
}

/// 계산된 피보나치 레벨.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FibonacciLevels {
    /// 기간 저가 (fib_0)
    pub low: Decimal,
    /// 기간 고가 (fib_100)
    pub high: Decimal,
    /// (레벨 %, 가격) 쌍 - 레벨 오름차순
    pub levels: Vec<(Decimal, Decimal)>,
}

impl FibonacciLevels {
    /// 현재가에서 가장 가까운 레벨과의 거리 비율을 반환합니다.
    pub fn nearest_level_distance(&self, price: Decimal) -> Option<(Decimal, Decimal)> {
        if price <= Decimal::ZERO {
            return None;
        }
        self.levels
            .iter()
            .map(|(level, value)| (*level, ((price - value) / price).abs()))
            .min_by(|a, b| a.1.cmp(&b.1))
    }
}

/// 기간 고가/저가 기준 피보나치 되돌림 레벨 계산.
pub fn fibonacci_levels(
    high: &[Decimal],
    low: &[Decimal],
    params: &FibonacciParams,
) -> IndicatorResult<FibonacciLevels> {
    let len = high.len().min(low.len());
    if len == 0 {
        return Err(IndicatorError::InsufficientData {
            required: 1,
            provided: 0,
        });
    }

    let start = len.saturating_sub(params.lookback);
    let window_high = high[start..len].iter().max().copied().unwrap_or_default();
    let window_low = low[start..len].iter().min().copied().unwrap_or_default();
    let diff = window_high - window_low;

    let levels = params
        .levels
        .iter()
        .map(|&level| {
            let value = if level == Decimal::ZERO {
                window_low
            } else if level == dec!(100) {
                window_high
            } else {
                window_low + diff * level / dec!(100)
            };
            (level, value)
        })
        .collect();

    Ok(FibonacciLevels {
        low: window_low,
        high: window_high,
        levels,
    })
}
