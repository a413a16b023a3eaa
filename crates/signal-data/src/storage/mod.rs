//! Postgres 저장소 구현.

pub mod backtest;
pub mod indicators;
pub mod market;
pub mod ohlcv;
pub mod signals;
