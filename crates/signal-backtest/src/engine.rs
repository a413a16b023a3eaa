//! 백테스트 엔진.
//!
//! 과거 캔들로 전략을 시뮬레이션합니다. 매 캔들마다 그 시점까지의
//! 데이터로 지표 프레임을 다시 만들어 미래 참조(Look-Ahead)를
//! 방지합니다.
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use signal_backtest::{BacktestEngine, BacktestParams};
//! use signal_strategy::StrategyKind;
//! use rust_decimal_macros::dec;
//!
//! let engine = BacktestEngine::new(BacktestParams::new(dec!(10_000_000)));
//! let result = engine.run(&bars, StrategyKind::Balanced)?;
//! println!("총 수익률: {:.2}%", result.total_return_pct);
//! ```

use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use signal_analytics::frame::{IndicatorFrame, IndicatorSettings};
use signal_analytics::market_trend::long_term_trend;
use signal_core::domain::{Kline, SignalAction, TrendType};
use signal_core::types::Ticker;
use signal_strategy::{
    combine, stop_loss, Strategy, StrategyAssessment, StrategyKind, StrategyMixConfig,
};

use crate::error::{BacktestError, Result};
use crate::portfolio::Portfolio;
use crate::result::{BacktestParams, BacktestResult};
use crate::trade::ExitReason;

/// 백테스트 엔진.
pub struct BacktestEngine {
    params: BacktestParams,
    settings: IndicatorSettings,
}

impl BacktestEngine {
    pub fn new(params: BacktestParams) -> Self {
        Self {
            params,
            settings: IndicatorSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: IndicatorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 단일 전략으로 백테스트를 실행합니다.
    #[instrument(skip(self, bars), fields(bars = bars.len()))]
    pub fn run(&self, bars: &[Kline], kind: StrategyKind) -> Result<BacktestResult> {
        let strategy = Strategy::of_kind(kind);
        self.simulate(bars, kind.as_str(), |frame, ticker, market, long_term| {
            Ok(strategy.analyze(frame, ticker, market, long_term))
        })
    }

    /// 전략 조합으로 백테스트를 실행합니다.
    #[instrument(skip(self, bars, mix), fields(bars = bars.len(), mix = %mix.name))]
    pub fn run_mix(&self, bars: &[Kline], mix: &StrategyMixConfig) -> Result<BacktestResult> {
        let members: Vec<(Strategy, f64)> = mix
            .members
            .iter()
            .map(|(kind, weight)| (Strategy::of_kind(*kind), *weight))
            .collect();

        self.simulate(bars, &mix.name, |frame, ticker, market, long_term| {
            let results: Vec<(StrategyAssessment, f64)> = members
                .iter()
                .map(|(strategy, weight)| {
                    (strategy.analyze(frame, ticker, market, long_term), *weight)
                })
                .collect();
            Ok(combine(mix, &results)?)
        })
    }

    /// 여러 전략을 같은 데이터로 비교합니다.
    pub fn compare(&self, bars: &[Kline], kinds: &[StrategyKind]) -> Result<Vec<BacktestResult>> {
        kinds.iter().map(|kind| self.run(bars, *kind)).collect()
    }

    fn simulate<F>(&self, bars: &[Kline], strategy_name: &str, evaluate: F) -> Result<BacktestResult>
    where
        F: Fn(&IndicatorFrame, &Ticker, TrendType, TrendType) -> Result<StrategyAssessment>,
    {
        self.params.validate()?;

        let warmup = self.settings.min_bars();
        if bars.len() <= warmup {
            return Err(BacktestError::Data(format!(
                "캔들이 부족합니다: 필요 {} 초과, 제공 {}",
                warmup,
                bars.len()
            )));
        }
        for window in bars.windows(2) {
            if window[0].open_time > window[1].open_time {
                return Err(BacktestError::Data(
                    "캔들이 시간순으로 정렬되어 있지 않습니다".to_string(),
                ));
            }
        }

        let ticker = bars[0].ticker.clone();
        let _span = signal_core::analysis_span!("backtest", ticker, strategy_name).entered();
        let mut portfolio = Portfolio::new(
            self.params.initial_capital,
            self.params.commission_rate,
            self.params.risk_per_trade,
        );
        let mut equity_curve: Vec<Decimal> = Vec::with_capacity(bars.len() - warmup);

        for i in warmup..bars.len() {
            let bar = &bars[i];

            // 손절 체크가 같은 캔들의 신호 청산보다 먼저
            if let Some(stop) = portfolio.position().map(|p| p.stop_loss) {
                if bar.low <= stop {
                    portfolio.close(ticker.as_str(), stop, bar.open_time, ExitReason::StopLoss);
                }
            }

            let frame = IndicatorFrame::compute(bars[..=i].to_vec(), &self.settings)?;
            let trend = long_term_trend(&frame);
            let assessment = evaluate(&frame, &ticker, trend, trend)?;

            if portfolio.has_position() {
                if assessment.has_signal && assessment.sell_score > assessment.buy_score {
                    portfolio.close(ticker.as_str(), bar.close, bar.open_time, ExitReason::Signal);
                }
            } else if assessment.has_signal && assessment.buy_score > assessment.sell_score {
                let stop = assessment
                    .signal
                    .as_ref()
                    .and_then(|s| s.stop_loss)
                    .or_else(|| stop_loss(&frame, SignalAction::Buy));

                if let Some(stop) = stop {
                    if portfolio.open(bar.close, stop, bar.open_time) {
                        debug!(bar = i, price = %bar.close, "매수 진입");
                    }
                }
            }

            equity_curve.push(portfolio.equity(bar.close));
        }

        // 미청산 포지션 강제 청산
        let last_bar = bars.last().expect("검증된 비어 있지 않은 캔들");
        if portfolio.has_position() {
            portfolio.close(
                ticker.as_str(),
                last_bar.close,
                last_bar.open_time,
                ExitReason::EndOfData,
            );
            if let Some(last) = equity_curve.last_mut() {
                *last = portfolio.cash();
            }
        }

        let result = BacktestResult::from_simulation(
            ticker.as_str(),
            strategy_name,
            self.params.clone(),
            bars[0].open_time,
            last_bar.open_time,
            &equity_curve,
            portfolio.into_trades(),
        );

        info!(
            strategy = strategy_name,
            trades = result.trade_count,
            total_return_pct = result.total_return_pct,
            "백테스트 완료"
        );

        Ok(result)
    }
}
