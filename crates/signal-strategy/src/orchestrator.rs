//! 신호 오케스트레이터.
//!
//! 여러 감지기의 점수를 합산하고 시장/장기 추세 필터를 적용해
//! 최종 매매 신호를 결정합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};

use signal_analytics::frame::{columns, IndicatorFrame};
use signal_core::domain::{SignalAction, SignalEvidence, TradingSignal, TrendType};
use signal_core::types::Ticker;

use crate::detectors::{DetectorContext, SignalDetector};

/// 감지기 합산 결과.
#[derive(Debug, Clone)]
pub struct ScoreBreakdown {
    /// 총 매수 점수
    pub buy_score: f64,
    /// 총 매도 점수
    pub sell_score: f64,
    /// 감지기별 근거
    pub evidence: Vec<SignalEvidence>,
}

impl ScoreBreakdown {
    /// 매수/매도 중 우세한 쪽의 점수.
    pub fn dominant_score(&self) -> f64 {
        self.buy_score.max(self.sell_score)
    }

    /// 모든 근거 설명을 모읍니다.
    pub fn all_details(&self) -> Vec<String> {
        self.evidence
            .iter()
            .flat_map(|e| e.details.iter().cloned())
            .collect()
    }
}

/// 감지기 집합을 조율하는 오케스트레이터.
pub struct SignalOrchestrator {
    detectors: Vec<Box<dyn SignalDetector>>,
    signal_threshold: f64,
}

impl SignalOrchestrator {
    pub fn new(detectors: Vec<Box<dyn SignalDetector>>, signal_threshold: f64) -> Self {
        Self {
            detectors,
            signal_threshold,
        }
    }

    /// 기본 임계값.
    pub fn threshold(&self) -> f64 {
        self.signal_threshold
    }

    /// 시장 추세에 따라 조정된 임계값.
    ///
    /// 하락장에서는 더 엄격하게(x1.2), 상승장에서는 더 느슨하게(x0.8).
    pub fn adjusted_threshold(&self, market_trend: TrendType) -> f64 {
        match market_trend {
            TrendType::Bearish => self.signal_threshold * 1.2,
            TrendType::Bullish => self.signal_threshold * 0.8,
            TrendType::Neutral => self.signal_threshold,
        }
    }

    /// 모든 감지기를 실행해 점수를 합산합니다.
    pub fn score(&self, ctx: &DetectorContext<'_>) -> ScoreBreakdown {
        let mut buy_score = 0.0;
        let mut sell_score = 0.0;
        let mut evidence = Vec::with_capacity(self.detectors.len());

        for detector in &self.detectors {
            let e = detector.detect(ctx);
            buy_score += e.buy_score;
            sell_score += e.sell_score;
            if e.buy_score > 0.0 || e.sell_score > 0.0 {
                evidence.push(e);
            }
        }

        debug!(buy_score, sell_score, detectors = self.detectors.len(), "감지기 점수 합산");

        ScoreBreakdown {
            buy_score,
            sell_score,
            evidence,
        }
    }

    /// 점수와 추세 필터로 최종 신호를 판정합니다.
    ///
    /// 매수 신호는 장기 추세가 상승일 때만, 매도 신호는 하락일 때만
    /// 확정됩니다.
    pub fn evaluate(
        &self,
        ticker: &Ticker,
        frame: &IndicatorFrame,
        breakdown: &ScoreBreakdown,
        market_trend: TrendType,
        long_term_trend: TrendType,
        strategy_name: &str,
    ) -> Option<TradingSignal> {
        let threshold = self.adjusted_threshold(market_trend);
        let price = frame.latest_close()?;
        let timestamp = frame.last_bar()?.open_time;

        let strong_buy =
            breakdown.buy_score >= threshold && breakdown.buy_score > breakdown.sell_score;
        let strong_sell =
            breakdown.sell_score >= threshold && breakdown.sell_score > breakdown.buy_score;

        if strong_buy && long_term_trend == TrendType::Bullish {
            info!(%ticker, score = breakdown.buy_score, "매수 신호 확정");
            let mut signal =
                TradingSignal::buy(ticker.clone(), strategy_name, breakdown.buy_score, price)
                    .with_evidence(breakdown.evidence.clone())
                    .with_timestamp(timestamp);
            if let Some(stop) = stop_loss(frame, SignalAction::Buy) {
                signal = signal.with_stop_loss(stop);
            }
            return Some(signal);
        }

        if strong_sell && long_term_trend == TrendType::Bearish {
            info!(%ticker, score = breakdown.sell_score, "매도 신호 확정");
            let mut signal =
                TradingSignal::sell(ticker.clone(), strategy_name, breakdown.sell_score, price)
                    .with_evidence(breakdown.evidence.clone())
                    .with_timestamp(timestamp);
            if let Some(stop) = stop_loss(frame, SignalAction::Sell) {
                signal = signal.with_stop_loss(stop);
            }
            return Some(signal);
        }

        None
    }
}

/// ATR 기반 손절가 (2 x ATR).
pub fn stop_loss(frame: &IndicatorFrame, action: SignalAction) -> Option<Decimal> {
    let atr = frame.latest(columns::ATR)?;
    if atr <= Decimal::ZERO {
        return None;
    }
    let close = frame.latest_close()?;

    match action {
        SignalAction::Buy => Some((close - atr * dec!(2)).max(dec!(0.01))),
        SignalAction::Sell => Some(close + atr * dec!(2)),
        SignalAction::Neutral => None,
    }
}
