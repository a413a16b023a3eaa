//! SMA 골든/데드 크로스 감지기.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use signal_analytics::frame::columns;
use signal_core::domain::SignalEvidence;

use super::{DetectorContext, SignalDetector};

/// 단기/중기 SMA 크로스와 추세 지속을 감지합니다.
///
/// ADX 강도에 따라 점수를 보정하고, 크로스 없이 정배열/역배열이
/// 유지되는 경우는 40% 가중치의 지속 신호로 처리합니다.
pub struct SmaCrossDetector {
    weight: f64,
}

impl SmaCrossDetector {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl SignalDetector for SmaCrossDetector {
    fn name(&self) -> &str {
        "sma_cross"
    }

    fn detect(&self, ctx: &DetectorContext<'_>) -> SignalEvidence {
        let frame = ctx.frame;
        let mut evidence = SignalEvidence::new(self.name(), 0.0, 0.0);

        let (Some(short), Some(mid), Some(prev_short), Some(prev_mid)) = (
            frame.latest(columns::SMA_SHORT),
            frame.latest(columns::SMA_MID),
            frame.prev(columns::SMA_SHORT),
            frame.prev(columns::SMA_MID),
        ) else {
            return evidence;
        };

        let adj = ctx.adjustments();
        let adx = frame.latest(columns::ADX).unwrap_or_default();
        let adx_f64 = adx.to_f64().unwrap_or(0.0);

        let golden_cross = prev_short < prev_mid && short > mid;
        let dead_cross = prev_short > prev_mid && short < mid;

        if golden_cross {
            let mut score = self.weight * adj.trend_follow_buy;
            let mut detail = format!("SMA 골든 크로스 ({short:.2} > {mid:.2})");
            if adx >= dec!(25) {
                score *= 1.2;
                detail.push_str(&format!(" (ADX 강세: {adx_f64:.2})"));
            } else if adx < dec!(20) {
                score *= 0.8;
                detail.push_str(&format!(" (ADX 약세: {adx_f64:.2})"));
            }
            evidence.buy_score += score;
            evidence.details.push(detail);
        } else if short > mid && adx >= dec!(20) {
            // 크로스 없는 상승 추세 지속
            let mut score = self.weight * adj.trend_follow_buy * 0.4;
            let mut detail = "SMA 상승 추세 지속".to_string();
            if adx >= dec!(25) {
                score *= 1.2;
                detail.push_str(&format!(" (ADX 강세: {adx_f64:.2})"));
            }
            evidence.buy_score += score;
            evidence.details.push(detail);
        }

        if dead_cross {
            let mut score = self.weight * adj.trend_follow_sell;
            let mut detail = format!("SMA 데드 크로스 ({short:.2} < {mid:.2})");
            if adx >= dec!(25) {
                score *= 1.2;
                detail.push_str(&format!(" (ADX 강세: {adx_f64:.2})"));
            } else if adx < dec!(20) {
                score *= 0.8;
                detail.push_str(&format!(" (ADX 약세: {adx_f64:.2})"));
            }
            evidence.sell_score += score;
            evidence.details.push(detail);
        } else if short < mid && adx >= dec!(20) {
            // 크로스 없는 하락 추세 지속
            let mut score = self.weight * adj.trend_follow_sell * 0.4;
            let mut detail = "SMA 하락 추세 지속".to_string();
            if adx >= dec!(25) {
                score *= 1.2;
                detail.push_str(&format!(" (ADX 강세: {adx_f64:.2})"));
            }
            evidence.sell_score += score;
            evidence.details.push(detail);
        }

        evidence
    }
}
