//! 스토캐스틱 크로스 감지기.

use rust_decimal_macros::dec;

use signal_analytics::frame::columns;
use signal_core::domain::SignalEvidence;

use super::{DetectorContext, SignalDetector};

/// %K와 %D의 크로스를 감지합니다.
///
/// 매수는 과매수 구간(%K >= 80) 밖에서, 매도는 과매도 구간
/// (%K <= 20) 밖에서만 유효합니다.
pub struct StochDetector {
    weight: f64,
}

impl StochDetector {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl SignalDetector for StochDetector {
    fn name(&self) -> &str {
        "stoch_cross"
    }

    fn detect(&self, ctx: &DetectorContext<'_>) -> SignalEvidence {
        let frame = ctx.frame;
        let mut evidence = SignalEvidence::new(self.name(), 0.0, 0.0);

        let (Some(k), Some(d), Some(prev_k), Some(prev_d)) = (
            frame.latest(columns::STOCH_K),
            frame.latest(columns::STOCH_D),
            frame.prev(columns::STOCH_K),
            frame.prev(columns::STOCH_D),
        ) else {
            return evidence;
        };

        let adj = ctx.adjustments().momentum_reversal;

        // %K 상향 돌파 + 과매수 구간 밖
        if prev_k < prev_d && k > d && k < dec!(80) {
            evidence.buy_score += self.weight * adj;
            evidence
                .details
                .push(format!("스토캐스틱 매수 (%K:{k:.2} > %D:{d:.2})"));
        }

        // %K 하향 돌파 + 과매도 구간 밖
        if prev_k > prev_d && k < d && k > dec!(20) {
            evidence.sell_score += self.weight * adj;
            evidence
                .details
                .push(format!("스토캐스틱 매도 (%K:{k:.2} < %D:{d:.2})"));
        }

        evidence
    }
}
