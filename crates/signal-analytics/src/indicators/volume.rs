//! 거래량 지표.

use rust_decimal::Decimal;

use super::{check_period, IndicatorResult};

/// 거래량 단순 이동평균 계산.
///
/// 거래량 급증 판정의 기준선으로 사용됩니다 (기본 기간 20).
pub fn volume_sma(volumes: &[Decimal], period: usize) -> IndicatorResult<Vec<Option<Decimal>>> {
    check_period(volumes.len(), period)?;

    let period_decimal = Decimal::from(period);
    let mut result = Vec::with_capacity(volumes.len());

    for i in 0..volumes.len() {
        if i < period - 1 {
            result.push(None);
        } else {
            let sum: Decimal = volumes[i + 1 - period..=i].iter().sum();
            result.push(Some(sum / period_decimal));
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_volume_sma() {
        let volumes: Vec<Decimal> = (1..=10).map(Decimal::from).collect();
        let result = volume_sma(&volumes, 5).unwrap();

        assert!(result[3].is_none());
        // (1+2+3+4+5) / 5 = 3
        assert_eq!(result[4], Some(dec!(3)));
        // (6+7+8+9+10) / 5 = 8
        assert_eq!(result[9], Some(dec!(8)));
    }

    #[test]
    fn test_volume_sma_insufficient() {
        let volumes = vec![dec!(100)];
        assert!(volume_sma(&volumes, 20).is_err());
    }
}
