//! 도메인 모델 정의.

pub mod kline;
pub mod market_indicator;
pub mod signal;
pub mod trend;

pub use kline::Kline;
pub use market_indicator::MarketIndicatorKind;
pub use signal::{
    confidence_from_score, SignalAction, SignalEvidence, SignalStrength, TradingSignal,
};
pub use trend::TrendType;
