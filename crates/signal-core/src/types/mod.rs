//! 공용 타입 정의.

pub mod ticker;
pub mod timeframe;

pub use ticker::Ticker;
pub use timeframe::Timeframe;
