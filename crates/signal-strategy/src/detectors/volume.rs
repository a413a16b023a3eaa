//! 거래량 급증 감지기.

use rust_decimal_macros::dec;

use signal_analytics::frame::columns;
use signal_core::domain::SignalEvidence;

use super::{DetectorContext, SignalDetector};

/// 거래량 급증 판정 배수 (평균 거래량 대비).
pub const VOLUME_SURGE_FACTOR: rust_decimal::Decimal = dec!(1.2);

/// 평균 대비 거래량 급증을 감지하고 종가 방향으로 신호를 만듭니다.
pub struct VolumeSurgeDetector {
    weight: f64,
}

impl VolumeSurgeDetector {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl SignalDetector for VolumeSurgeDetector {
    fn name(&self) -> &str {
        "volume_surge"
    }

    fn detect(&self, ctx: &DetectorContext<'_>) -> SignalEvidence {
        let frame = ctx.frame;
        let mut evidence = SignalEvidence::new(self.name(), 0.0, 0.0);

        let bars = frame.bars();
        if bars.len() < 2 {
            return evidence;
        }
        let latest = &bars[bars.len() - 1];
        let prev = &bars[bars.len() - 2];

        let Some(volume_avg) = frame.latest(columns::VOLUME_SMA) else {
            return evidence;
        };

        let adj = ctx.adjustments().volume;

        if latest.volume > volume_avg * VOLUME_SURGE_FACTOR {
            if latest.close > prev.close {
                evidence.buy_score += self.weight * adj;
                evidence.details.push(format!(
                    "거래량 급증 (현재:{} > 평균:{volume_avg:.0} x {VOLUME_SURGE_FACTOR})",
                    latest.volume
                ));
            } else if latest.close < prev.close {
                evidence.sell_score += self.weight * adj;
                evidence.details.push(format!(
                    "하락 시 거래량 급증 (현재:{} > 평균:{volume_avg:.0} x {VOLUME_SURGE_FACTOR})",
                    latest.volume
                ));
            }
        }

        evidence
    }
}
