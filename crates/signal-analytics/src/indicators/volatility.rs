//! 변동성 지표.
//!
//! - Bollinger Bands
//! - ATR (Average True Range)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{check_period, IndicatorError, IndicatorResult};

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 20)
    pub period: usize,
    /// 표준편차 배수 (기본: 2.0)
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: dec!(2.0),
        }
    }
}

/// 볼린저 밴드 결과.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    /// 상단 밴드 (MA + k × σ)
    pub upper: Option<Decimal>,
    /// 중간 밴드 (이동평균)
    pub middle: Option<Decimal>,
    /// 하단 밴드 (MA - k × σ)
    pub lower: Option<Decimal>,
    /// %B ((현재가 - 하단) / (상단 - 하단))
    pub percent_b: Option<Decimal>,
    /// 밴드 폭 ((상단 - 하단) / 중간)
    pub bandwidth: Option<Decimal>,
}

/// ATR 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtrParams {
    /// ATR 기간 (기본: 14)
    pub period: usize,
}

impl Default for AtrParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 볼린저 밴드 계산.
pub fn bollinger_bands(
    prices: &[Decimal],
    params: BollingerBandsParams,
) -> IndicatorResult<Vec<BollingerBandsResult>> {
    let period = params.period;
    check_period(prices.len(), period)?;

    let period_decimal = Decimal::from(period);
    let mut result = Vec::with_capacity(prices.len());

    for i in 0..prices.len() {
        if i < period - 1 {
            result.push(BollingerBandsResult {
                upper: None,
                middle: None,
                lower: None,
                percent_b: None,
                bandwidth: None,
            });
            continue;
        }

        let window = &prices[i + 1 - period..=i];
        let ma: Decimal = window.iter().sum::<Decimal>() / period_decimal;

        let variance: Decimal = window
            .iter()
            .map(|&p| {
                let diff = p - ma;
                diff * diff
            })
            .sum::<Decimal>()
            / period_decimal;
        let std_dev = sqrt_decimal(variance);

        let deviation = params.std_dev_multiplier * std_dev;
        let upper = ma + deviation;
        let lower = ma - deviation;

        let percent_b = if upper != lower {
            Some((prices[i] - lower) / (upper - lower))
        } else {
            Some(dec!(0.5)) // 밴드가 수렴하면 중립값
        };

        let bandwidth = if ma != Decimal::ZERO {
            Some((upper - lower) / ma)
        } else {
            None
        };

        result.push(BollingerBandsResult {
            upper: Some(upper),
            middle: Some(ma),
            lower: Some(lower),
            percent_b,
            bandwidth,
        });
    }

    Ok(result)
}

/// ATR 계산.
///
/// True Range = max(고가 - 저가, |고가 - 전일종가|, |저가 - 전일종가|),
/// ATR = True Range의 지수 평활 평균 (alpha = 1/period).
pub fn atr(
    high: &[Decimal],
    low: &[Decimal],
    close: &[Decimal],
    params: AtrParams,
) -> IndicatorResult<Vec<Option<Decimal>>> {
    let len = high.len().min(low.len()).min(close.len());
    let period = params.period;

    if len < period + 1 {
        return Err(IndicatorError::InsufficientData {
            required: period + 1,
            provided: len,
        });
    }

    let mut true_ranges = Vec::with_capacity(len);
    true_ranges.push(high[0] - low[0]); // 첫 번째는 당일 범위

    for i in 1..len {
        let hl = high[i] - low[i];
        let hc = (high[i] - close[i - 1]).abs();
        let lc = (low[i] - close[i - 1]).abs();
        true_ranges.push(hl.max(hc).max(lc));
    }

    let alpha = Decimal::ONE / Decimal::from(period);
    let one_minus_alpha = Decimal::ONE - alpha;
    let mut result: Vec<Option<Decimal>> = Vec::with_capacity(len);

    for i in 0..len {
        if i < period - 1 {
            result.push(None);
        } else if i == period - 1 {
            // 초기 ATR은 단순 평균
            let sum: Decimal = true_ranges[..=i].iter().sum();
            result.push(Some(sum / Decimal::from(period)));
        } else if let Some(prev) = result[i - 1] {
            result.push(Some(true_ranges[i] * alpha + prev * one_minus_alpha));
        } else {
            result.push(None);
        }
    }

    Ok(result)
}

/// 밴드 폭 시계열의 하위 분위수 계산.
///
/// 스퀴즈 판정에 사용: 현재 밴드 폭이 최근 `window`개 값의
/// `quantile`(0.0~1.0) 분위수보다 작으면 변동성 응축 상태로 봅니다.
pub fn bandwidth_quantile(
    bandwidths: &[Option<Decimal>],
    window: usize,
    quantile: f64,
) -> Option<Decimal> {
    if !(0.0..=1.0).contains(&quantile) {
        return None;
    }

    let start = bandwidths.len().saturating_sub(window);
    let mut values: Vec<Decimal> = bandwidths[start..].iter().flatten().copied().collect();
    if values.is_empty() {
        return None;
    }

    values.sort();
    let idx = ((values.len() - 1) as f64 * quantile).round() as usize;
    values.get(idx).copied()
}

/// Decimal 제곱근 계산 (Newton-Raphson 방법).
///
/// Decimal 타입은 기본 제곱근 함수가 없으므로 직접 구현합니다.
pub fn sqrt_decimal(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut x = value;
    let two = dec!(2);

    // 10회 반복이면 충분한 정밀도
    for _ in 0..10 {
        x = (x + value / x) / two;
    }

    x
}
