//! # Signal Analytics
//!
//! 기술적 지표 계산과 시장 분석을 제공합니다.
//!
//! - 지표 계산기 (SMA, EMA, MACD, RSI, Stochastic, Bollinger, ATR, ADX, 거래량)
//! - 캔들 시계열 + 지표 컬럼을 묶은 `IndicatorFrame`
//! - 장기 추세 및 시장 상황 판정
//! - VIX / 버핏 지수 기반 거시 심리 분석

pub mod frame;
pub mod indicators;
pub mod macro_sentiment;
pub mod market_trend;

pub use frame::{columns, IndicatorFrame, IndicatorSettings};
pub use indicators::{IndicatorError, IndicatorResult};
pub use macro_sentiment::{
    combined_sentiment, BuffettAnalysis, SentimentSignal, VixAnalysis, VixLevel, VixTrend,
};
pub use market_trend::{atr_volatility_ratio, long_term_trend, MarketCondition};
