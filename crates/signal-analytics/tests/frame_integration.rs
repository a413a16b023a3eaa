//! 지표 프레임 통합 테스트.
//!
//! 실제 사용 흐름대로 캔들 시계열에서 프레임을 만들고 추세/시장 상황
//! 판정까지 한 번에 검증합니다.

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use signal_analytics::frame::{columns, IndicatorFrame, IndicatorSettings};
use signal_analytics::market_trend::{atr_volatility_ratio, long_term_trend, MarketCondition};
use signal_core::domain::{Kline, TrendType};
use signal_core::types::{Ticker, Timeframe};

fn daily_bars(closes: &[Decimal]) -> Vec<Kline> {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            Kline::new(
                Ticker::new("AAPL"),
                Timeframe::D1,
                start + Duration::days(i as i64),
                close - dec!(0.5),
                close + dec!(1.5),
                close - dec!(1.5),
                close,
                Decimal::from(2_000_000 + (i % 10) as i64 * 100_000),
            )
        })
        .collect()
}

fn uptrend_closes(count: usize) -> Vec<Decimal> {
    (0..count)
        .map(|i| Decimal::from(100) + Decimal::from(i as i64) * dec!(0.8))
        .collect()
}

#[test]
fn uptrend_frame_produces_bullish_assessment() {
    let bars = daily_bars(&uptrend_closes(120));
    let frame = IndicatorFrame::compute(bars, &IndicatorSettings::default()).unwrap();

    assert_eq!(frame.len(), 120);
    assert_eq!(long_term_trend(&frame), TrendType::Bullish);

    // 상승 추세에서는 RSI가 중립(50) 위
    let rsi = frame.latest(columns::RSI).unwrap();
    assert!(rsi > dec!(50));

    // +DI가 -DI보다 커야 함
    let plus = frame.latest(columns::PLUS_DI).unwrap();
    let minus = frame.latest(columns::MINUS_DI).unwrap();
    assert!(plus > minus);

    // 일정한 변동폭이라 극단 변동성으로 분류되지 않음
    let condition = MarketCondition::from_frame(&frame);
    assert_eq!(condition, MarketCondition::BullMarket);
}

#[test]
fn downtrend_frame_produces_bearish_assessment() {
    let closes: Vec<Decimal> = (0..120)
        .map(|i| Decimal::from(300) - Decimal::from(i as i64) * dec!(0.8))
        .collect();
    let frame = IndicatorFrame::compute(daily_bars(&closes), &IndicatorSettings::default()).unwrap();

    assert_eq!(long_term_trend(&frame), TrendType::Bearish);
    assert!(frame.latest(columns::RSI).unwrap() < dec!(50));
    assert_eq!(MarketCondition::from_frame(&frame), MarketCondition::BearMarket);
}

#[test]
fn volatility_spike_dominates_condition() {
    // 조용한 횡보 뒤 마지막 5일에 큰 변동폭
    let mut closes: Vec<Decimal> = (0..115)
        .map(|i| if i % 2 == 0 { dec!(100) } else { dec!(101) })
        .collect();
    closes.extend([dec!(95), dec!(108), dec!(92), dec!(110), dec!(90)]);

    let mut bars = daily_bars(&closes);
    // 마지막 5일의 고저 범위를 크게 벌림
    let len = bars.len();
    for bar in bars.iter_mut().skip(len - 5) {
        bar.high = bar.close + dec!(12);
        bar.low = bar.close - dec!(12);
    }

    let frame = IndicatorFrame::compute(bars, &IndicatorSettings::default()).unwrap();
    let ratio = atr_volatility_ratio(&frame).unwrap();
    assert!(ratio > dec!(1.5));
    assert_eq!(
        MarketCondition::from_frame(&frame),
        MarketCondition::HighVolatility
    );
}

#[test]
fn fibonacci_levels_span_window_extremes() {
    let bars = daily_bars(&uptrend_closes(120));
    let frame = IndicatorFrame::compute(bars, &IndicatorSettings::default()).unwrap();

    let fib = frame.fibonacci();
    assert!(fib.high > fib.low);
    assert_eq!(fib.levels.len(), 6);

    // 모든 레벨은 [저가, 고가] 구간 안
    for (_, value) in &fib.levels {
        assert!(*value >= fib.low && *value <= fib.high);
    }
}
