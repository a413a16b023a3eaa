//! 모멘텀 지표.
//!
//! - RSI (Relative Strength Index)
//! - Stochastic Oscillator

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{check_period, IndicatorError, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14)
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 스토캐스틱 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StochasticParams {
    /// %K 기간 (기본: 14)
    pub k_period: usize,
    /// %D 기간 (기본: 3)
    pub d_period: usize,
}

impl Default for StochasticParams {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
        }
    }
}

/// 스토캐스틱 결과.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StochasticResult {
    /// %K (Fast)
    pub k: Option<Decimal>,
    /// %D (%K의 이동평균)
    pub d: Option<Decimal>,
}

/// RSI 계산.
///
/// 상승폭/하락폭을 지수 가중 평균(alpha = 1/period)으로 평활한 뒤
/// RSI = 100 - 100 / (1 + RS), RS = 평균 상승폭 / 평균 하락폭.
pub fn rsi(prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
    let period = params.period;

    if period == 0 {
        return Err(IndicatorError::InvalidParameter(
            "기간은 0보다 커야 합니다".to_string(),
        ));
    }
    if prices.len() < period + 1 {
        return Err(IndicatorError::InsufficientData {
            required: period + 1,
            provided: prices.len(),
        });
    }

    let mut gains = Vec::with_capacity(prices.len());
    let mut losses = Vec::with_capacity(prices.len());
    gains.push(Decimal::ZERO);
    losses.push(Decimal::ZERO);

    for i in 1..prices.len() {
        let delta = prices[i] - prices[i - 1];
        if delta > Decimal::ZERO {
            gains.push(delta);
            losses.push(Decimal::ZERO);
        } else {
            gains.push(Decimal::ZERO);
            losses.push(-delta);
        }
    }

    let alpha = Decimal::ONE / Decimal::from(period);
    let avg_gains = ewm(&gains, alpha, period);
    let avg_losses = ewm(&losses, alpha, period);

    let mut result = Vec::with_capacity(prices.len());
    for i in 0..prices.len() {
        match (avg_gains[i], avg_losses[i]) {
            (Some(gain), Some(loss)) => {
                if loss == Decimal::ZERO {
                    result.push(Some(dec!(100)));
                } else {
                    let rs = gain / loss;
                    result.push(Some(dec!(100) - dec!(100) / (Decimal::ONE + rs)));
                }
            }
            _ => result.push(None),
        }
    }

    Ok(result)
}

/// 지수 가중 평균. 초기값은 첫 `min_periods` 구간의 단순 평균.
fn ewm(values: &[Decimal], alpha: Decimal, min_periods: usize) -> Vec<Option<Decimal>> {
    let mut result = Vec::with_capacity(values.len());
    if values.is_empty() {
        return result;
    }

    let one_minus_alpha = Decimal::ONE - alpha;
    let mut current = values[0];

    for i in 0..values.len() {
        if i < min_periods - 1 {
            result.push(None);
            if i > 0 {
                current = values[i] * alpha + current * one_minus_alpha;
            }
        } else if i == min_periods - 1 {
            let sum: Decimal = values[..=i].iter().sum();
            current = sum / Decimal::from(i + 1);
            result.push(Some(current));
        } else {
            current = values[i] * alpha + current * one_minus_alpha;
            result.push(Some(current));
        }
    }

    result
}

/// 스토캐스틱 오실레이터 계산.
///
/// %K = (종가 - 기간 최저가) / (기간 최고가 - 기간 최저가) × 100,
/// %D = %K의 이동평균.
pub fn stochastic(
    high: &[Decimal],
    low: &[Decimal],
    close: &[Decimal],
    params: StochasticParams,
) -> IndicatorResult<Vec<StochasticResult>> {
    let len = high.len().min(low.len()).min(close.len());
    check_period(len, params.k_period)?;

    let mut k_values: Vec<Option<Decimal>> = Vec::with_capacity(len);

    for i in 0..len {
        if i < params.k_period - 1 {
            k_values.push(None);
        } else {
            let start = i + 1 - params.k_period;
            let highest = high[start..=i].iter().max().copied().unwrap_or(Decimal::ZERO);
            let lowest = low[start..=i].iter().min().copied().unwrap_or(Decimal::ZERO);

            let range = highest - lowest;
            if range == Decimal::ZERO {
                k_values.push(Some(dec!(50))); // 범위가 0이면 중립값
            } else {
                k_values.push(Some((close[i] - lowest) / range * dec!(100)));
            }
        }
    }

    let mut result = Vec::with_capacity(len);
    for i in 0..len {
        if i < params.k_period + params.d_period - 2 {
            result.push(StochasticResult {
                k: k_values[i],
                d: None,
            });
        } else {
            let start = i + 1 - params.d_period;
            let window: Vec<Decimal> = k_values[start..=i].iter().filter_map(|v| *v).collect();
            let d = if window.is_empty() {
                None
            } else {
                Some(window.iter().sum::<Decimal>() / Decimal::from(window.len()))
            };
            result.push(StochasticResult {
                k: k_values[i],
                d,
            });
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rsi_range() {
        let prices: Vec<Decimal> = vec![
            dec!(100), dec!(102), dec!(101), dec!(103), dec!(105), dec!(104),
            dec!(106), dec!(108), dec!(107), dec!(109), dec!(111), dec!(110),
            dec!(112), dec!(114), dec!(113), dec!(115),
        ];
        let result = rsi(&prices, RsiParams::default()).unwrap();

        for value in result.iter().flatten() {
            assert!(*value >= Decimal::ZERO && *value <= dec!(100));
        }
    }

    #[test]
    fn test_rsi_all_gains() {
        // 하락이 전혀 없으면 RSI = 100
        let prices: Vec<Decimal> = (0..20).map(|i| Decimal::from(100 + i)).collect();
        let result = rsi(&prices, RsiParams::default()).unwrap();
        assert_eq!(*result.last().unwrap(), Some(dec!(100)));
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let prices = vec![dec!(100), dec!(101)];
        assert!(rsi(&prices, RsiParams::default()).is_err());
    }

    #[test]
    fn test_stochastic_range() {
        let high: Vec<Decimal> = (0..20).map(|i| Decimal::from(105 + i)).collect();
        let low: Vec<Decimal> = (0..20).map(|i| Decimal::from(95 + i)).collect();
        let close: Vec<Decimal> = (0..20).map(|i| Decimal::from(100 + i)).collect();

        let result = stochastic(&high, &low, &close, StochasticParams::default()).unwrap();
        assert_eq!(result.len(), 20);

        for s in result.iter() {
            if let Some(k) = s.k {
                assert!(k >= Decimal::ZERO && k <= dec!(100));
            }
            if let Some(d) = s.d {
                assert!(d >= Decimal::ZERO && d <= dec!(100));
            }
        }
    }

    #[test]
    fn test_stochastic_flat_range_neutral() {
        // 고가 == 저가 구간에서는 중립값 50
        let flat = vec![dec!(100); 20];
        let result = stochastic(&flat, &flat, &flat, StochasticParams::default()).unwrap();
        assert_eq!(result[19].k, Some(dec!(50)));
    }

    proptest! {
        #[test]
        fn prop_rsi_bounded(prices in proptest::collection::vec(1u32..10_000, 20..60)) {
            let prices: Vec<Decimal> = prices.into_iter().map(Decimal::from).collect();
            let result = rsi(&prices, RsiParams::default()).unwrap();
            for value in result.iter().flatten() {
                prop_assert!(*value >= Decimal::ZERO);
                prop_assert!(*value <= dec!(100));
            }
        }
    }
}
