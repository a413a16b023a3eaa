//! MACD 크로스 감지기.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use signal_analytics::frame::columns;
use signal_core::domain::SignalEvidence;

use super::{DetectorContext, SignalDetector};

/// MACD 라인과 시그널 라인의 골든/데드 크로스를 감지합니다.
///
/// ADX가 25 미만이면 추세 확신이 낮다고 보고 점수를 절반으로 줄입니다.
pub struct MacdDetector {
    weight: f64,
}

impl MacdDetector {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl SignalDetector for MacdDetector {
    fn name(&self) -> &str {
        "macd_cross"
    }

    fn detect(&self, ctx: &DetectorContext<'_>) -> SignalEvidence {
        let frame = ctx.frame;
        let mut evidence = SignalEvidence::new(self.name(), 0.0, 0.0);

        let (Some(macd), Some(signal), Some(prev_macd), Some(prev_signal)) = (
            frame.latest(columns::MACD_LINE),
            frame.latest(columns::MACD_SIGNAL),
            frame.prev(columns::MACD_LINE),
            frame.prev(columns::MACD_SIGNAL),
        ) else {
            return evidence;
        };

        let adj = ctx.adjustments();
        let adx = frame.latest(columns::ADX).unwrap_or_default();
        let weak_adx = adx < dec!(25);
        let adx_f64 = adx.to_f64().unwrap_or(0.0);

        // 골든 크로스
        if prev_macd < prev_signal && macd > signal {
            let mut score = self.weight * adj.trend_follow_buy;
            if weak_adx {
                score *= 0.5;
                evidence
                    .details
                    .push(format!("MACD 골든 크로스 (ADX 약세로 가중치 감소: {adx_f64:.2})"));
            }
            evidence.buy_score += score;
            evidence
                .details
                .push(format!("MACD 골든 크로스 ({macd:.2} > {signal:.2})"));
        }

        // 데드 크로스
        if prev_macd > prev_signal && macd < signal {
            let mut score = self.weight * adj.trend_follow_sell;
            if weak_adx {
                score *= 0.5;
                evidence
                    .details
                    .push(format!("MACD 데드 크로스 (ADX 약세로 가중치 감소: {adx_f64:.2})"));
            }
            evidence.sell_score += score;
            evidence
                .details
                .push(format!("MACD 데드 크로스 ({macd:.2} < {signal:.2})"));
        }

        evidence
    }
}
