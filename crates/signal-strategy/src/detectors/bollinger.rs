//! 볼린저 밴드 감지기.
//!
//! 두 가지 모드를 지원합니다:
//! - 평균 회귀: 밴드 이탈 상태와 복귀 이벤트를 감지
//! - 변동성 돌파: 스퀴즈 후 밴드 돌파를 감지

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use signal_analytics::frame::{columns, IndicatorFrame};
use signal_analytics::indicators::bandwidth_quantile;
use signal_core::domain::SignalEvidence;

use super::{DetectorContext, SignalDetector};

/// 볼린저 감지기 동작 모드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BollingerMode {
    /// 평균 회귀 (밴드 이탈 후 복귀)
    MeanReversion,
    /// 변동성 돌파 (스퀴즈 후 확장)
    Breakout,
}

/// 스퀴즈 판정에 사용하는 밴드 폭 분위수 창.
const SQUEEZE_WINDOW: usize = 50;
const SQUEEZE_QUANTILE: f64 = 0.1;

pub struct BollingerDetector {
    weight: f64,
    mode: BollingerMode,
}

impl BollingerDetector {
    pub fn new(weight: f64, mode: BollingerMode) -> Self {
        Self { weight, mode }
    }

    fn detect_mean_reversion(&self, ctx: &DetectorContext<'_>) -> SignalEvidence {
        let frame = ctx.frame;
        let mut evidence = SignalEvidence::new(self.name(), 0.0, 0.0);

        let bars = frame.bars();
        if bars.len() < 2 {
            return evidence;
        }
        let close = bars[bars.len() - 1].close;
        let prev_close = bars[bars.len() - 2].close;

        let (Some(upper), Some(lower), Some(bandwidth)) = (
            frame.latest(columns::BB_UPPER),
            frame.latest(columns::BB_LOWER),
            frame.latest(columns::BB_BANDWIDTH),
        ) else {
            return evidence;
        };
        if bandwidth == Decimal::ZERO {
            return evidence;
        }

        let prev_upper = frame.prev(columns::BB_UPPER);
        let prev_lower = frame.prev(columns::BB_LOWER);
        let adj = ctx.adjustments().momentum_reversal;

        // 하단 이탈: 이탈 폭에 비례한 상태 점수
        if close < lower {
            let strength = ((lower - close) / bandwidth).to_f64().unwrap_or(0.0);
            evidence.buy_score += self.weight * adj * (0.5 + strength);
            evidence
                .details
                .push(format!("BB 하단 이탈 상태 (가격: {close:.2})"));

            // 복귀 이벤트 보너스
            if let Some(pl) = prev_lower {
                if prev_close < pl && close > lower {
                    evidence.buy_score += self.weight * adj * 0.5;
                    evidence.details.push("BB 하단 복귀 이벤트".to_string());
                }
            }
        }

        // 상단 이탈
        if close > upper {
            let strength = ((close - upper) / bandwidth).to_f64().unwrap_or(0.0);
            evidence.sell_score += self.weight * adj * (0.5 + strength);
            evidence
                .details
                .push(format!("BB 상단 이탈 상태 (가격: {close:.2})"));

            if let Some(pu) = prev_upper {
                if prev_close > pu && close < upper {
                    evidence.sell_score += self.weight * adj * 0.5;
                    evidence.details.push("BB 상단 복귀 이벤트".to_string());
                }
            }
        }

        evidence
    }

    fn detect_breakout(&self, ctx: &DetectorContext<'_>) -> SignalEvidence {
        let frame = ctx.frame;
        let mut evidence = SignalEvidence::new(self.name(), 0.0, 0.0);

        let bars = frame.bars();
        if bars.len() < 2 {
            return evidence;
        }
        let close = bars[bars.len() - 1].close;
        let prev_close = bars[bars.len() - 2].close;

        let (Some(upper), Some(lower), Some(bandwidth), Some(prev_upper), Some(prev_lower)) = (
            frame.latest(columns::BB_UPPER),
            frame.latest(columns::BB_LOWER),
            frame.latest(columns::BB_BANDWIDTH),
            frame.prev(columns::BB_UPPER),
            frame.prev(columns::BB_LOWER),
        ) else {
            return evidence;
        };

        let adj = ctx.adjustments().bb_kc;
        let is_squeezed = is_squeezed(frame, bandwidth);

        // 상단 돌파
        let breakout_buy_event = prev_close < prev_upper && close > upper;
        if is_squeezed && breakout_buy_event {
            evidence.buy_score += self.weight * adj;
            evidence
                .details
                .push(format!("BB 스퀴즈 후 상단 돌파 이벤트 (밴드폭: {bandwidth:.4})"));
        } else if close > upper && close > prev_close {
            evidence.buy_score += self.weight * adj * 0.5;
            evidence
                .details
                .push(format!("BB 상단 돌파 지속 상태 (가격: {close:.2})"));
        }

        // 하단 돌파
        let breakout_sell_event = prev_close > prev_lower && close < lower;
        if is_squeezed && breakout_sell_event {
            evidence.sell_score += self.weight * adj;
            evidence
                .details
                .push(format!("BB 스퀴즈 후 하단 돌파 이벤트 (밴드폭: {bandwidth:.4})"));
        } else if close < lower && close < prev_close {
            evidence.sell_score += self.weight * adj * 0.5;
            evidence
                .details
                .push(format!("BB 하단 돌파 지속 상태 (가격: {close:.2})"));
        }

        evidence
    }
}

/// 현재 밴드 폭이 최근 구간의 하위 분위수보다 좁은지 (변동성 응축).
fn is_squeezed(frame: &IndicatorFrame, current_bandwidth: Decimal) -> bool {
    frame
        .column(columns::BB_BANDWIDTH)
        .and_then(|bw| bandwidth_quantile(bw, SQUEEZE_WINDOW, SQUEEZE_QUANTILE))
        .map(|q| current_bandwidth < q)
        .unwrap_or(false)
}

impl SignalDetector for BollingerDetector {
    fn name(&self) -> &str {
        match self.mode {
            BollingerMode::MeanReversion => "bb_mean_reversion",
            BollingerMode::Breakout => "bb_breakout",
        }
    }

    fn detect(&self, ctx: &DetectorContext<'_>) -> SignalEvidence {
        match self.mode {
            BollingerMode::MeanReversion => self.detect_mean_reversion(ctx),
            BollingerMode::Breakout => self.detect_breakout(ctx),
        }
    }
}
