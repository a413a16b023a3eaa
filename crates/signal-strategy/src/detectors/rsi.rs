//! RSI 과매수/과매도 감지기.

use rust_decimal_macros::dec;

use signal_analytics::frame::columns;
use signal_core::domain::SignalEvidence;

use super::{DetectorContext, SignalDetector};

/// RSI의 과매도 탈출(30 상향 돌파)과 과매수 하락(70 하향 이탈)을
/// 감지합니다.
pub struct RsiDetector {
    weight: f64,
}

impl RsiDetector {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl SignalDetector for RsiDetector {
    fn name(&self) -> &str {
        "rsi_reversal"
    }

    fn detect(&self, ctx: &DetectorContext<'_>) -> SignalEvidence {
        let frame = ctx.frame;
        let mut evidence = SignalEvidence::new(self.name(), 0.0, 0.0);

        let (Some(rsi), Some(prev_rsi)) =
            (frame.latest(columns::RSI), frame.prev(columns::RSI))
        else {
            return evidence;
        };

        let adj = ctx.adjustments().momentum_reversal;

        // 과매도 탈출 (<= 30 -> > 30)
        if prev_rsi <= dec!(30) && rsi > dec!(30) {
            evidence.buy_score += self.weight * adj;
            evidence
                .details
                .push(format!("RSI 과매도 탈출 ({prev_rsi:.2} -> {rsi:.2})"));
        }

        // 과매수 하락 (>= 70 -> < 70)
        if prev_rsi >= dec!(70) && rsi < dec!(70) {
            evidence.sell_score += self.weight * adj;
            evidence
                .details
                .push(format!("RSI 과매수 하락 ({prev_rsi:.2} -> {rsi:.2})"));
        }

        evidence
    }
}
