//! ADX 강한 추세 감지기.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use signal_analytics::frame::columns;
use signal_core::domain::SignalEvidence;

use super::{DetectorContext, SignalDetector};

/// ADX가 25를 넘는 강한 추세에서 ±DI 방향으로 신호를 만듭니다.
pub struct AdxDetector {
    weight: f64,
}

impl AdxDetector {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl SignalDetector for AdxDetector {
    fn name(&self) -> &str {
        "adx_trend"
    }

    fn detect(&self, ctx: &DetectorContext<'_>) -> SignalEvidence {
        let frame = ctx.frame;
        let mut evidence = SignalEvidence::new(self.name(), 0.0, 0.0);

        let (Some(adx), Some(plus_di), Some(minus_di)) = (
            frame.latest(columns::ADX),
            frame.latest(columns::PLUS_DI),
            frame.latest(columns::MINUS_DI),
        ) else {
            return evidence;
        };

        if adx <= dec!(25) {
            return evidence;
        }

        let adj = ctx.adjustments();
        let adx_f64 = adx.to_f64().unwrap_or(0.0);

        if plus_di > minus_di {
            evidence.buy_score += self.weight * adj.trend_follow_buy;
            evidence
                .details
                .push(format!("ADX 강한 상승 추세 ({adx_f64:.2})"));
        } else if minus_di > plus_di {
            evidence.sell_score += self.weight * adj.trend_follow_sell;
            evidence
                .details
                .push(format!("ADX 강한 하락 추세 ({adx_f64:.2})"));
        }

        evidence
    }
}
