//! 피보나치 되돌림 레벨 반전 감지기.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use signal_analytics::frame::columns;
use signal_core::domain::SignalEvidence;

use super::{DetectorContext, SignalDetector};

/// 주요 되돌림 레벨(38.2/50/61.8%) 근처에서 모멘텀 반전이 함께
/// 나타나면 지지/저항 반등으로 감지합니다.
///
/// 레벨 근접 판정은 0.5 x ATR 이내입니다.
pub struct FibReversalDetector {
    weight: f64,
}

impl FibReversalDetector {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

fn is_key_level(level: Decimal) -> bool {
    level == dec!(38.2) || level == dec!(50) || level == dec!(61.8)
}

impl SignalDetector for FibReversalDetector {
    fn name(&self) -> &str {
        "fib_reversal"
    }

    fn detect(&self, ctx: &DetectorContext<'_>) -> SignalEvidence {
        let frame = ctx.frame;
        let mut evidence = SignalEvidence::new(self.name(), 0.0, 0.0);

        let (Some(close), Some(atr)) = (frame.latest_close(), frame.latest(columns::ATR)) else {
            return evidence;
        };
        if atr <= Decimal::ZERO {
            return evidence;
        }
        let proximity = atr * dec!(0.5);

        let near = frame
            .fibonacci()
            .levels
            .iter()
            .filter(|(level, _)| is_key_level(*level))
            .find(|(_, value)| (close - *value).abs() <= proximity);
        let Some(&(level, value)) = near else {
            return evidence;
        };

        let (Some(rsi), Some(prev_rsi)) = (frame.latest(columns::RSI), frame.prev(columns::RSI))
        else {
            return evidence;
        };
        let (Some(k), Some(d), Some(prev_k), Some(prev_d)) = (
            frame.latest(columns::STOCH_K),
            frame.latest(columns::STOCH_D),
            frame.prev(columns::STOCH_K),
            frame.prev(columns::STOCH_D),
        ) else {
            return evidence;
        };

        let adj = ctx.adjustments().pivot_fib;

        // 레벨 지지 + 모멘텀 상향 반전
        let reversal_up = (prev_rsi <= dec!(30) && rsi > dec!(30))
            || (prev_k < prev_d && k > d && k < dec!(80));
        if reversal_up {
            evidence.buy_score += self.weight * adj;
            evidence.details.push(format!(
                "Fib {level}% 지지 반등 (레벨:{value:.2}, 종가:{close:.2})"
            ));
        }

        // 레벨 저항 + 모멘텀 하향 반전
        let reversal_down = (prev_rsi >= dec!(70) && rsi < dec!(70))
            || (prev_k > prev_d && k < d && k > dec!(20));
        if reversal_down {
            evidence.sell_score += self.weight * adj;
            evidence.details.push(format!(
                "Fib {level}% 저항 반락 (레벨:{value:.2}, 종가:{close:.2})"
            ));
        }

        evidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal::Decimal;

    use signal_analytics::frame::{IndicatorFrame, IndicatorSettings};
    use signal_core::domain::{Kline, TrendType};
    use signal_core::types::{Ticker, Timeframe};

    fn bars_from_closes(closes: &[Decimal]) -> Vec<Kline> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, close)| {
                Kline::new(
                    Ticker::new("AAPL"),
                    Timeframe::D1,
                    start + Duration::days(i as i64),
                    *close,
                    *close + dec!(2),
                    *close - dec!(2),
                    *close,
                    dec!(1000000),
                )
            })
            .collect()
    }

    #[test]
    fn test_bounce_at_half_retracement_scores_buy() {
        // 고점 200 -> 저점 100 하락 후 50% 레벨(150)로 반등
        let mut closes: Vec<Decimal> = vec![dec!(200); 20];
        closes.extend((1..=100).map(|i| dec!(200) - Decimal::from(i)));
        closes.push(dec!(150));

        let frame =
            IndicatorFrame::compute(bars_from_closes(&closes), &IndicatorSettings::default())
                .unwrap();
        let ctx = DetectorContext::new(&frame, TrendType::Neutral, TrendType::Neutral);

        let evidence = FibReversalDetector::new(7.0).detect(&ctx);
        assert!(evidence.buy_score > 0.0);
        assert_eq!(evidence.sell_score, 0.0);
        assert!(evidence.details.iter().any(|d| d.contains("지지 반등")));
    }

    #[test]
    fn test_level_without_momentum_reversal_is_silent() {
        // 횡보: 종가가 50% 레벨 위지만 모멘텀 반전이 없음
        let closes = vec![dec!(100); 70];
        let frame =
            IndicatorFrame::compute(bars_from_closes(&closes), &IndicatorSettings::default())
                .unwrap();
        let ctx = DetectorContext::new(&frame, TrendType::Neutral, TrendType::Neutral);

        let evidence = FibReversalDetector::new(7.0).detect(&ctx);
        assert_eq!(evidence.buy_score, 0.0);
        assert_eq!(evidence.sell_score, 0.0);
    }
}
