//! 전략 계층 통합 테스트.
//!
//! 합성 캔들 시계열로 프레임을 만들고 전략/조합/매니저 전체 흐름을
//! 검증합니다.

use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use signal_analytics::frame::{IndicatorFrame, IndicatorSettings};
use signal_analytics::market_trend::long_term_trend;
use signal_core::domain::{Kline, SignalAction, SignalStrength, TrendType};
use signal_core::types::{Ticker, Timeframe};
use signal_strategy::{
    auto_select_strategy, mix_config, MixMode, Strategy, StrategyKind, StrategyManager,
    StrategySelection,
};

/// 일정하게 움직이는 캔들 시계열. 마지막 캔들은 거래량 급증.
fn trending_bars(count: usize, start_price: Decimal, step: Decimal) -> Vec<Kline> {
    let start = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let close = start_price + step * Decimal::from(i as i64);
            let volume = if i == count - 1 {
                dec!(2500000) // 마지막 캔들 거래량 급증
            } else {
                dec!(1000000)
            };
            Kline::new(
                Ticker::new("AAPL"),
                Timeframe::D1,
                start + Duration::days(i as i64),
                close - step / dec!(2),
                close + dec!(2),
                close - dec!(2),
                close,
                volume,
            )
        })
        .collect()
}

fn uptrend_frame() -> IndicatorFrame {
    IndicatorFrame::compute(
        trending_bars(120, dec!(100), dec!(0.8)),
        &IndicatorSettings::default(),
    )
    .unwrap()
}

fn downtrend_frame() -> IndicatorFrame {
    IndicatorFrame::compute(
        trending_bars(120, dec!(300), dec!(-0.8)),
        &IndicatorSettings::default(),
    )
    .unwrap()
}

#[test]
fn balanced_strategy_confirms_buy_in_uptrend() {
    let frame = uptrend_frame();
    let ticker = Ticker::new("AAPL");
    let trend = long_term_trend(&frame);
    assert_eq!(trend, TrendType::Bullish);

    let strategy = Strategy::of_kind(StrategyKind::Balanced);
    let result = strategy.analyze(&frame, &ticker, TrendType::Bullish, trend);

    assert!(result.has_signal);
    assert!(result.buy_score > result.sell_score);
    assert_eq!(result.strength, SignalStrength::Strong);

    let signal = result.signal.expect("매수 신호");
    assert_eq!(signal.action, SignalAction::Buy);
    assert!(!signal.evidence.is_empty());

    // 손절가는 현재가에서 2 x ATR 아래
    let stop = signal.stop_loss.expect("손절가");
    assert!(stop < signal.price);
    assert!(stop > Decimal::ZERO);
}

#[test]
fn balanced_strategy_confirms_sell_in_downtrend() {
    let frame = downtrend_frame();
    let ticker = Ticker::new("AAPL");
    let trend = long_term_trend(&frame);
    assert_eq!(trend, TrendType::Bearish);

    let strategy = Strategy::of_kind(StrategyKind::Balanced);
    let result = strategy.analyze(&frame, &ticker, TrendType::Bearish, trend);

    assert!(result.has_signal);
    assert!(result.sell_score > result.buy_score);

    let signal = result.signal.expect("매도 신호");
    assert_eq!(signal.action, SignalAction::Sell);
    // 매도 손절가는 현재가 위
    assert!(signal.stop_loss.expect("손절가") > signal.price);
}

#[test]
fn long_term_trend_filter_blocks_counter_trend_signal() {
    let frame = uptrend_frame();
    let ticker = Ticker::new("AAPL");

    let strategy = Strategy::of_kind(StrategyKind::Balanced);
    // 점수는 충분하지만 장기 추세가 중립이면 신호를 확정하지 않음
    let result = strategy.analyze(&frame, &ticker, TrendType::Bullish, TrendType::Neutral);

    assert!(result.buy_score > 0.0);
    assert!(result.signal.is_none());
    assert!(!result.has_signal);
}

#[test]
fn bearish_market_raises_threshold() {
    let frame = uptrend_frame();
    let ticker = Ticker::new("AAPL");
    let strategy = Strategy::of_kind(StrategyKind::Conservative);

    // 같은 데이터라도 하락장 보정(x1.2)에서는 더 엄격
    let bullish = strategy.analyze(&frame, &ticker, TrendType::Bullish, TrendType::Bullish);
    let bearish = strategy.analyze(&frame, &ticker, TrendType::Bearish, TrendType::Bullish);

    // 하락장에서는 매수 점수 자체도 약화(0.5배)되어야 함
    assert!(bearish.buy_score < bullish.buy_score);
}

#[test]
fn manager_single_mode_routes_to_strategy() {
    let frame = uptrend_frame();
    let ticker = Ticker::new("AAPL");

    let manager = StrategyManager::from_mode("balanced", None).unwrap();
    let result = manager
        .analyze(&frame, &ticker, TrendType::Bullish, TrendType::Bullish)
        .unwrap();

    assert_eq!(result.strategy_name, "balanced");
    assert!(result.has_signal);
}

#[test]
fn manager_threshold_override_applies() {
    let frame = uptrend_frame();
    let ticker = Ticker::new("AAPL");

    // 임계값을 비현실적으로 높이면 신호가 사라져야 함
    let manager = StrategyManager::from_mode("balanced", Some(100.0)).unwrap();
    let result = manager
        .analyze(&frame, &ticker, TrendType::Bullish, TrendType::Bullish)
        .unwrap();

    assert!(!result.has_signal);
    assert!(result.buy_score > 0.0);
}

#[test]
fn manager_mix_mode_combines_members() {
    let frame = uptrend_frame();
    let ticker = Ticker::new("AAPL");

    let manager = StrategyManager::from_mode("mix:balanced_mix", None).unwrap();
    let result = manager
        .analyze(&frame, &ticker, TrendType::Bullish, TrendType::Bullish)
        .unwrap();

    assert!(result.strategy_name.starts_with("mix("));
    assert!(result.total_score > 0.0);
    assert!(result.buy_score > result.sell_score);
}

#[test]
fn manager_auto_mode_selects_by_market_condition() {
    let frame = uptrend_frame();
    let ticker = Ticker::new("AAPL");

    let manager = StrategyManager::from_mode("auto", None).unwrap();
    assert!(matches!(manager.selection(), StrategySelection::Auto));

    // 상승장 + 보통 변동성이면 모멘텀 단일 전략이어야 함
    let result = manager
        .analyze(&frame, &ticker, TrendType::Bullish, TrendType::Bullish)
        .unwrap();
    assert_eq!(result.strategy_name, "momentum");
    assert!(result.total_score > 0.0);
}

#[test]
fn auto_select_picks_single_strategy_per_condition() {
    // 변동성 비율이 정상 범위인 프레임에서는 추세가 상황을 결정
    let up = uptrend_frame();
    assert_eq!(
        auto_select_strategy(&up, TrendType::Bullish),
        StrategyKind::Momentum
    );
    assert_eq!(
        auto_select_strategy(&up, TrendType::Bearish),
        StrategyKind::Conservative
    );
    assert_eq!(
        auto_select_strategy(&up, TrendType::Neutral),
        StrategyKind::Scalping
    );
}

#[test]
fn voting_mix_uses_majority() {
    let config = mix_config("conservative_mix").unwrap();
    assert_eq!(config.mode, MixMode::Voting);
    assert_eq!(config.members.len(), 3);
    // 투표 조합은 높은 임계값 보정을 사용
    assert!(config.threshold_adjustment > 1.0);
}

#[test]
fn analyze_all_covers_catalog() {
    let frame = uptrend_frame();
    let ticker = Ticker::new("AAPL");

    let manager = StrategyManager::from_mode("balanced", None).unwrap();
    let results = manager.analyze_all(&frame, &ticker, TrendType::Bullish, TrendType::Bullish);

    assert_eq!(results.len(), StrategyKind::ALL.len());
    for result in &results {
        assert!(result.total_score >= 0.0);
    }
}
