//! 백테스트 엔진 통합 테스트.
//!
//! 합성 캔들 시계열로 진입/청산/손절 흐름과 결과 지표를 검증합니다.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use signal_analytics::frame::{IndicatorFrame, IndicatorSettings};
use signal_backtest::{BacktestEngine, BacktestParams, ExitReason};
use signal_core::domain::{Kline, SignalAction};
use signal_core::types::{Ticker, Timeframe};
use signal_data::{BarSource, Result as DataResult};
use signal_strategy::{mix_config, stop_loss, StrategyKind};

/// 일정하게 움직이는 일봉 시계열.
fn bars_with(
    count: usize,
    start_price: Decimal,
    step: Decimal,
    day_offset: usize,
) -> Vec<Kline> {
    let start = Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let close = start_price + step * Decimal::from(i as i64);
            Kline::new(
                Ticker::new("AAPL"),
                Timeframe::D1,
                start + Duration::days((day_offset + i) as i64),
                close - step / dec!(2),
                close + dec!(2),
                close - dec!(2),
                close,
                dec!(1000000),
            )
        })
        .collect()
}

fn uptrend_bars(count: usize) -> Vec<Kline> {
    bars_with(count, dec!(100), dec!(0.8), 0)
}

#[test]
fn uptrend_run_enters_and_profits() {
    let engine = BacktestEngine::new(BacktestParams::new(dec!(10000)));
    let result = engine
        .run(&uptrend_bars(150), StrategyKind::Balanced)
        .unwrap();

    assert!(result.trade_count >= 1);
    // 상승장에서는 마지막 강제 청산까지 보유해 수익
    assert!(result.final_equity > dec!(10000));
    assert!(result.total_return_pct > 0.0);
    assert!((0.0..=1.0).contains(&result.win_rate));

    // 열린 채 끝난 포지션은 종료 시 청산으로 기록
    assert!(result
        .trades
        .iter()
        .any(|t| t.exit_reason == ExitReason::EndOfData || t.exit_reason == ExitReason::Signal));
}

#[test]
fn crash_triggers_stop_loss() {
    // 100일 상승 후 급락
    let mut bars = uptrend_bars(100);
    let last_close = bars.last().unwrap().close;
    bars.extend(bars_with(30, last_close, dec!(-5), 100));

    let engine = BacktestEngine::new(BacktestParams::new(dec!(10000)));
    let result = engine.run(&bars, StrategyKind::Balanced).unwrap();

    assert!(result.trade_count >= 1);
    assert!(result
        .trades
        .iter()
        .any(|t| t.exit_reason == ExitReason::StopLoss));
    // 급락 구간의 낙폭이 기록되어야 함
    assert!(result.max_drawdown_pct > 0.0);
}

#[test]
fn insufficient_bars_is_error() {
    let engine = BacktestEngine::new(BacktestParams::new(dec!(10000)));
    assert!(engine.run(&uptrend_bars(30), StrategyKind::Balanced).is_err());
}

#[test]
fn unsorted_bars_is_error() {
    let mut bars = uptrend_bars(150);
    bars.swap(10, 120);

    let engine = BacktestEngine::new(BacktestParams::new(dec!(10000)));
    assert!(engine.run(&bars, StrategyKind::Balanced).is_err());
}

#[test]
fn invalid_params_is_error() {
    let engine = BacktestEngine::new(BacktestParams::new(dec!(-1)));
    assert!(engine.run(&uptrend_bars(150), StrategyKind::Balanced).is_err());
}

#[test]
fn mix_run_produces_result() {
    let mix = mix_config("balanced_mix").unwrap();
    let engine = BacktestEngine::new(BacktestParams::new(dec!(10000)));
    let result = engine.run_mix(&uptrend_bars(150), &mix).unwrap();

    assert_eq!(result.strategy, "balanced_mix");
    assert!(result.final_equity > Decimal::ZERO);
}

#[test]
fn compare_runs_each_strategy() {
    let bars = uptrend_bars(150);
    let kinds = [
        StrategyKind::Conservative,
        StrategyKind::Balanced,
        StrategyKind::Aggressive,
    ];

    let engine = BacktestEngine::new(BacktestParams::new(dec!(10000)));
    let results = engine.compare(&bars, &kinds).unwrap();

    assert_eq!(results.len(), 3);
    for (result, kind) in results.iter().zip(kinds.iter()) {
        assert_eq!(result.strategy, kind.as_str());
        assert_eq!(result.params.initial_capital, dec!(10000));
    }
}

#[test]
fn stop_loss_fills_at_stop_price() {
    // 상승 후 급락: 손절 체크가 같은 캔들의 신호 평가보다 먼저라서
    // 체결가는 캔들 종가가 아니라 진입 시점의 손절가여야 함
    let mut bars = uptrend_bars(100);
    let last_close = bars.last().unwrap().close;
    bars.extend(bars_with(30, last_close, dec!(-5), 100));

    let engine = BacktestEngine::new(BacktestParams::new(dec!(10000)));
    let result = engine.run(&bars, StrategyKind::Balanced).unwrap();

    let stopped = result
        .trades
        .iter()
        .find(|t| t.exit_reason == ExitReason::StopLoss)
        .expect("손절 트레이드");

    // 진입 캔들 시점 프레임에서 손절가를 다시 계산해 체결가와 대조
    let entry_idx = bars
        .iter()
        .position(|b| b.open_time == stopped.entry_time)
        .expect("진입 캔들");
    let frame = IndicatorFrame::compute(
        bars[..=entry_idx].to_vec(),
        &IndicatorSettings::default(),
    )
    .unwrap();
    let expected_stop = stop_loss(&frame, SignalAction::Buy).expect("손절가");

    assert_eq!(stopped.exit_price, expected_stop);
    assert!(stopped.exit_price < stopped.entry_price);
}

/// 고정된 캔들 목록을 돌려주는 테스트용 소스.
struct FixedBars {
    bars: Vec<Kline>,
}

#[async_trait]
impl BarSource for FixedBars {
    async fn bars(
        &self,
        _ticker: &Ticker,
        _timeframe: Timeframe,
        limit: usize,
    ) -> DataResult<Vec<Kline>> {
        let skip = self.bars.len().saturating_sub(limit);
        Ok(self.bars.iter().skip(skip).cloned().collect())
    }

    async fn bars_between(
        &self,
        _ticker: &Ticker,
        _timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DataResult<Vec<Kline>> {
        Ok(self
            .bars
            .iter()
            .filter(|b| b.open_time >= start && b.open_time <= end)
            .cloned()
            .collect())
    }
}

#[tokio::test]
async fn source_backed_run_matches_direct_run() {
    let bars = uptrend_bars(150);
    let source = FixedBars { bars: bars.clone() };

    let fetched = source
        .bars(&Ticker::new("AAPL"), Timeframe::D1, 150)
        .await
        .unwrap();

    let engine = BacktestEngine::new(BacktestParams::new(dec!(10000)));
    let from_source = engine.run(&fetched, StrategyKind::Balanced).unwrap();
    let direct = engine.run(&bars, StrategyKind::Balanced).unwrap();

    assert_eq!(from_source.trade_count, direct.trade_count);
    assert_eq!(from_source.final_equity, direct.final_equity);
}

#[test]
fn commission_reduces_profit() {
    let bars = uptrend_bars(150);

    let free = BacktestEngine::new(
        BacktestParams::new(dec!(10000)).with_commission_rate(Decimal::ZERO),
    )
    .run(&bars, StrategyKind::Balanced)
    .unwrap();
    let costly = BacktestEngine::new(
        BacktestParams::new(dec!(10000)).with_commission_rate(dec!(0.01)),
    )
    .run(&bars, StrategyKind::Balanced)
    .unwrap();

    assert!(free.final_equity > costly.final_equity);
}
