//! 추세 지표.
//!
//! - SMA (단순 이동평균)
//! - EMA (지수 이동평균)
//! - MACD
//! - ADX (+DI / -DI 포함)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{check_period, IndicatorError, IndicatorResult};

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12)
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26)
    pub slow_period: usize,
    /// 시그널 라인 기간 (기본: 9)
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD 결과.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdResult {
    /// MACD 라인 (단기 EMA - 장기 EMA)
    pub macd: Option<Decimal>,
    /// 시그널 라인 (MACD의 EMA)
    pub signal: Option<Decimal>,
    /// 히스토그램 (MACD - 시그널)
    pub histogram: Option<Decimal>,
}

/// ADX 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdxParams {
    /// ADX 기간 (기본: 14)
    pub period: usize,
}

impl Default for AdxParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// ADX 결과.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdxResult {
    /// 추세 강도 (0-100)
    pub adx: Option<Decimal>,
    /// +DI
    pub plus_di: Option<Decimal>,
    /// -DI
    pub minus_di: Option<Decimal>,
}

/// 단순 이동평균 (SMA) 계산.
///
/// 처음 `period - 1`개 시점은 `None`.
pub fn sma(prices: &[Decimal], period: usize) -> IndicatorResult<Vec<Option<Decimal>>> {
    check_period(prices.len(), period)?;

    let period_decimal = Decimal::from(period);
    let mut result = Vec::with_capacity(prices.len());

    for i in 0..prices.len() {
        if i < period - 1 {
            result.push(None);
        } else {
            let sum: Decimal = prices[i + 1 - period..=i].iter().sum();
            result.push(Some(sum / period_decimal));
        }
    }

    Ok(result)
}

/// 지수 이동평균 (EMA) 계산.
///
/// 첫 EMA 값은 해당 구간의 SMA로 시작합니다.
/// k = 2 / (period + 1)
pub fn ema(prices: &[Decimal], period: usize) -> IndicatorResult<Vec<Option<Decimal>>> {
    check_period(prices.len(), period)?;

    let mut result = vec![None; period - 1];
    let multiplier = dec!(2) / Decimal::from(period + 1);

    let initial: Decimal = prices[..period].iter().sum::<Decimal>() / Decimal::from(period);
    result.push(Some(initial));

    let mut prev = initial;
    for price in prices.iter().skip(period) {
        let value = (*price * multiplier) + (prev * (Decimal::ONE - multiplier));
        result.push(Some(value));
        prev = value;
    }

    Ok(result)
}

/// MACD 계산.
///
/// MACD 라인 = 단기 EMA - 장기 EMA,
/// 시그널 라인 = MACD 라인의 EMA,
/// 히스토그램 = MACD - 시그널.
pub fn macd(prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
    let min_required = params.slow_period + params.signal_period;
    if prices.len() < min_required {
        return Err(IndicatorError::InsufficientData {
            required: min_required,
            provided: prices.len(),
        });
    }

    let fast = ema(prices, params.fast_period)?;
    let slow = ema(prices, params.slow_period)?;

    let macd_line: Vec<Option<Decimal>> = fast
        .iter()
        .zip(slow.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(*f - *s),
            _ => None,
        })
        .collect();

    // 시그널 라인은 유효한 MACD 값 구간에 대해서만 계산
    let macd_values: Vec<Decimal> = macd_line.iter().flatten().copied().collect();
    let signal_line = if macd_values.len() >= params.signal_period {
        ema(&macd_values, params.signal_period)?
    } else {
        vec![None; macd_values.len()]
    };

    let mut result = Vec::with_capacity(prices.len());
    let mut signal_idx = 0;

    for value in macd_line.iter() {
        if value.is_some() {
            let signal = signal_line.get(signal_idx).copied().flatten();
            let histogram = match (*value, signal) {
                (Some(m), Some(s)) => Some(m - s),
                _ => None,
            };
            result.push(MacdResult {
                macd: *value,
                signal,
                histogram,
            });
            signal_idx += 1;
        } else {
            result.push(MacdResult {
                macd: None,
                signal: None,
                histogram: None,
            });
        }
    }

    Ok(result)
}

/// ADX 계산.
///
/// +DM/-DM과 True Range를 기간 이동평균으로 평활한 뒤
/// DX = 100 × |+DI - -DI| / (+DI + -DI), ADX = DX의 이동평균.
pub fn adx(
    high: &[Decimal],
    low: &[Decimal],
    close: &[Decimal],
    params: AdxParams,
) -> IndicatorResult<Vec<AdxResult>> {
    let len = high.len().min(low.len()).min(close.len());
    let period = params.period;

    // DX 이동평균까지 필요하므로 2배 기간 + 1
    if len < period * 2 + 1 {
        return Err(IndicatorError::InsufficientData {
            required: period * 2 + 1,
            provided: len,
        });
    }

    // +DM, -DM, True Range
    let mut plus_dm = vec![Decimal::ZERO; len];
    let mut minus_dm = vec![Decimal::ZERO; len];
    let mut tr = vec![Decimal::ZERO; len];
    tr[0] = high[0] - low[0];

    for i in 1..len {
        let high_diff = high[i] - high[i - 1];
        let low_diff = low[i - 1] - low[i];

        if high_diff > low_diff && high_diff > Decimal::ZERO {
            plus_dm[i] = high_diff;
        }
        if low_diff > high_diff && low_diff > Decimal::ZERO {
            minus_dm[i] = low_diff;
        }

        let hl = high[i] - low[i];
        let hc = (high[i] - close[i - 1]).abs();
        let lc = (low[i] - close[i - 1]).abs();
        tr[i] = hl.max(hc).max(lc);
    }

    let rolling_mean = |values: &[Decimal]| -> Vec<Option<Decimal>> {
        let mut out = Vec::with_capacity(values.len());
        let period_decimal = Decimal::from(period);
        for i in 0..values.len() {
            if i < period - 1 {
                out.push(None);
            } else {
                let sum: Decimal = values[i + 1 - period..=i].iter().sum();
                out.push(Some(sum / period_decimal));
            }
        }
        out
    };

    let tr_smooth = rolling_mean(&tr);
    let plus_smooth = rolling_mean(&plus_dm);
    let minus_smooth = rolling_mean(&minus_dm);

    // +DI, -DI, DX
    let mut plus_di = vec![None; len];
    let mut minus_di = vec![None; len];
    let mut dx = vec![None; len];
    let hundred = dec!(100);

    for i in 0..len {
        if let (Some(tr_s), Some(p), Some(m)) = (tr_smooth[i], plus_smooth[i], minus_smooth[i]) {
            if tr_s > Decimal::ZERO {
                let pdi = hundred * (p / tr_s);
                let mdi = hundred * (m / tr_s);
                plus_di[i] = Some(pdi);
                minus_di[i] = Some(mdi);

                let di_sum = pdi + mdi;
                if di_sum > Decimal::ZERO {
                    dx[i] = Some(hundred * (pdi - mdi).abs() / di_sum);
                }
            }
        }
    }

    // ADX = DX의 이동평균 (유효 구간 기준)
    let mut result = Vec::with_capacity(len);
    let period_decimal = Decimal::from(period);

    for i in 0..len {
        let adx_value = if i + 1 >= period {
            let window = &dx[i + 1 - period..=i];
            let values: Vec<Decimal> = window.iter().flatten().copied().collect();
            if values.len() == period {
                Some(values.iter().sum::<Decimal>() / period_decimal)
            } else {
                None
            }
        } else {
            None
        };

        result.push(AdxResult {
            adx: adx_value,
            plus_di: plus_di[i],
            minus_di: minus_di[i],
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_prices() -> Vec<Decimal> {
        vec![
            dec!(100), dec!(102), dec!(101), dec!(103), dec!(105),
            dec!(104), dec!(106), dec!(108), dec!(107), dec!(109),
        ]
    }

    #[test]
    fn test_sma_basic() {
        let prices = sample_prices();
        let result = sma(&prices, 3).unwrap();

        assert!(result[0].is_none());
        assert!(result[1].is_none());
        // (100 + 102 + 101) / 3 = 101
        assert_eq!(result[2], Some(dec!(101)));
    }

    #[test]
    fn test_sma_insufficient_data() {
        let prices = vec![dec!(100), dec!(101)];
        assert!(matches!(
            sma(&prices, 20),
            Err(IndicatorError::InsufficientData { required: 20, provided: 2 })
        ));
    }

    #[test]
    fn test_ema_seeded_with_sma() {
        let prices = sample_prices();
        let result = ema(&prices, 3).unwrap();

        assert!(result[1].is_none());
        // 첫 EMA는 처음 3개의 SMA
        assert_eq!(result[2], Some(dec!(101)));
        assert!(result[9].is_some());
    }

    #[test]
    fn test_macd_shape() {
        let prices: Vec<Decimal> = (0..50).map(|i| Decimal::from(100 + i)).collect();
        let result = macd(&prices, MacdParams::default()).unwrap();

        assert_eq!(result.len(), prices.len());
        assert!(result[0].macd.is_none());
        assert!(result[40].macd.is_some());
        assert!(result[45].histogram.is_some());
    }

    #[test]
    fn test_adx_strong_uptrend() {
        // 꾸준히 상승하는 시장에서는 +DI > -DI, ADX가 유효해야 함
        let high: Vec<Decimal> = (0..40).map(|i| Decimal::from(105 + i * 2)).collect();
        let low: Vec<Decimal> = (0..40).map(|i| Decimal::from(95 + i * 2)).collect();
        let close: Vec<Decimal> = (0..40).map(|i| Decimal::from(100 + i * 2)).collect();

        let result = adx(&high, &low, &close, AdxParams::default()).unwrap();
        let last = result.last().unwrap();

        let plus = last.plus_di.unwrap();
        let minus = last.minus_di.unwrap();
        assert!(plus > minus);
        assert!(last.adx.is_some());
    }

    #[test]
    fn test_adx_insufficient_data() {
        let prices = sample_prices();
        assert!(adx(&prices, &prices, &prices, AdxParams::default()).is_err());
    }
}
