//! 캔들 시계열 + 지표 컬럼 프레임.
//!
//! 신호 감지기와 전략 계층이 공유하는 입력 구조입니다. 캔들 배열에서
//! 모든 기본 지표를 한 번에 계산해 이름 붙은 컬럼으로 보관합니다.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use signal_core::domain::Kline;

use crate::indicators::{
    adx, atr, bollinger_bands, fibonacci_levels, macd, rsi, sma, stochastic, volume_sma,
    AdxParams, AtrParams, BollingerBandsParams, FibonacciLevels, FibonacciParams, IndicatorError,
    IndicatorResult, MacdParams, RsiParams, StochasticParams,
};

/// 지표 컬럼 이름 상수.
pub mod columns {
    pub const SMA_SHORT: &str = "sma_5";
    pub const SMA_MID: &str = "sma_20";
    pub const SMA_LONG: &str = "sma_60";
    pub const RSI: &str = "rsi_14";
    pub const MACD_LINE: &str = "macd_line";
    pub const MACD_SIGNAL: &str = "macd_signal";
    pub const MACD_HISTOGRAM: &str = "macd_histogram";
    pub const STOCH_K: &str = "stoch_k";
    pub const STOCH_D: &str = "stoch_d";
    pub const BB_UPPER: &str = "bb_upper";
    pub const BB_MIDDLE: &str = "bb_middle";
    pub const BB_LOWER: &str = "bb_lower";
    pub const BB_PERCENT_B: &str = "bb_percent_b";
    pub const BB_BANDWIDTH: &str = "bb_bandwidth";
    pub const ATR: &str = "atr_14";
    pub const ADX: &str = "adx_14";
    pub const PLUS_DI: &str = "plus_di";
    pub const MINUS_DI: &str = "minus_di";
    pub const VOLUME_SMA: &str = "volume_sma_20";
}

/// 지표 계산 설정.
///
/// 모든 기간은 원본 전략이 사용하는 기본값을 따릅니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSettings {
    /// 단기 SMA 기간 (기본: 5)
    pub sma_short: usize,
    /// 중기 SMA 기간 (기본: 20)
    pub sma_mid: usize,
    /// 장기 SMA 기간 (기본: 60)
    pub sma_long: usize,
    pub rsi: RsiParams,
    pub macd: MacdParams,
    pub stochastic: StochasticParams,
    pub bollinger: BollingerBandsParams,
    pub atr: AtrParams,
    pub adx: AdxParams,
    /// 거래량 SMA 기간 (기본: 20)
    pub volume_sma_period: usize,
    pub fibonacci: FibonacciParams,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            sma_short: 5,
            sma_mid: 20,
            sma_long: 60,
            rsi: RsiParams::default(),
            macd: MacdParams::default(),
            stochastic: StochasticParams::default(),
            bollinger: BollingerBandsParams::default(),
            atr: AtrParams::default(),
            adx: AdxParams::default(),
            volume_sma_period: 20,
            fibonacci: FibonacciParams::default(),
        }
    }
}

impl IndicatorSettings {
    /// 모든 지표를 계산하기 위한 최소 캔들 수.
    pub fn min_bars(&self) -> usize {
        let macd_required = self.macd.slow_period + self.macd.signal_period;
        let adx_required = self.adx.period * 2 + 1;
        self.sma_long.max(macd_required).max(adx_required)
    }
}

/// 캔들 시계열과 계산된 지표 컬럼.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    bars: Vec<Kline>,
    columns: HashMap<&'static str, Vec<Option<Decimal>>>,
    fibonacci: FibonacciLevels,
}

impl IndicatorFrame {
    /// 캔들 배열에서 모든 지표 컬럼을 계산합니다.
    ///
    /// 가장 긴 웜업을 가진 지표(기본 설정에서는 60일 SMA)를 계산할 수
    /// 있을 만큼 캔들이 있어야 합니다.
    pub fn compute(bars: Vec<Kline>, settings: &IndicatorSettings) -> IndicatorResult<Self> {
        let required = settings.min_bars();
        if bars.len() < required {
            return Err(IndicatorError::InsufficientData {
                required,
                provided: bars.len(),
            });
        }

        let close: Vec<Decimal> = bars.iter().map(|b| b.close).collect();
        let high: Vec<Decimal> = bars.iter().map(|b| b.high).collect();
        let low: Vec<Decimal> = bars.iter().map(|b| b.low).collect();
        let volume: Vec<Decimal> = bars.iter().map(|b| b.volume).collect();

        let mut cols: HashMap<&'static str, Vec<Option<Decimal>>> = HashMap::new();

        cols.insert(columns::SMA_SHORT, sma(&close, settings.sma_short)?);
        cols.insert(columns::SMA_MID, sma(&close, settings.sma_mid)?);
        cols.insert(columns::SMA_LONG, sma(&close, settings.sma_long)?);
        cols.insert(columns::RSI, rsi(&close, settings.rsi)?);

        let macd_result = macd(&close, settings.macd)?;
        cols.insert(
            columns::MACD_LINE,
            macd_result.iter().map(|m| m.macd).collect(),
        );
        cols.insert(
            columns::MACD_SIGNAL,
            macd_result.iter().map(|m| m.signal).collect(),
        );
        cols.insert(
            columns::MACD_HISTOGRAM,
            macd_result.iter().map(|m| m.histogram).collect(),
        );

        let stoch = stochastic(&high, &low, &close, settings.stochastic)?;
        cols.insert(columns::STOCH_K, stoch.iter().map(|s| s.k).collect());
        cols.insert(columns::STOCH_D, stoch.iter().map(|s| s.d).collect());

        let bb = bollinger_bands(&close, settings.bollinger)?;
        cols.insert(columns::BB_UPPER, bb.iter().map(|b| b.upper).collect());
        cols.insert(columns::BB_MIDDLE, bb.iter().map(|b| b.middle).collect());
        cols.insert(columns::BB_LOWER, bb.iter().map(|b| b.lower).collect());
        cols.insert(
            columns::BB_PERCENT_B,
            bb.iter().map(|b| b.percent_b).collect(),
        );
        cols.insert(
            columns::BB_BANDWIDTH,
            bb.iter().map(|b| b.bandwidth).collect(),
        );

        cols.insert(columns::ATR, atr(&high, &low, &close, settings.atr)?);

        let adx_result = adx(&high, &low, &close, settings.adx)?;
        cols.insert(columns::ADX, adx_result.iter().map(|a| a.adx).collect());
        cols.insert(
            columns::PLUS_DI,
            adx_result.iter().map(|a| a.plus_di).collect(),
        );
        cols.insert(
            columns::MINUS_DI,
            adx_result.iter().map(|a| a.minus_di).collect(),
        );

        cols.insert(
            columns::VOLUME_SMA,
            volume_sma(&volume, settings.volume_sma_period)?,
        );

        let fibonacci = fibonacci_levels(&high, &low, &settings.fibonacci)?;

        debug!(bars = bars.len(), columns = cols.len(), "지표 프레임 계산 완료");

        Ok(Self {
            bars,
            columns: cols,
            fibonacci,
        })
    }

    /// 캔들 수.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// 전체 캔들 슬라이스.
    pub fn bars(&self) -> &[Kline] {
        &self.bars
    }

    /// 마지막 캔들.
    pub fn last_bar(&self) -> Option<&Kline> {
        self.bars.last()
    }

    /// 이름으로 지표 컬럼을 조회합니다.
    pub fn column(&self, name: &str) -> Option<&[Option<Decimal>]> {
        self.columns.get(name).map(|v| v.as_slice())
    }

    /// 특정 시점의 지표 값.
    pub fn value_at(&self, name: &str, index: usize) -> Option<Decimal> {
        self.columns.get(name)?.get(index).copied().flatten()
    }

    /// 마지막 시점의 지표 값.
    pub fn latest(&self, name: &str) -> Option<Decimal> {
        if self.bars.is_empty() {
            return None;
        }
        self.value_at(name, self.bars.len() - 1)
    }

    /// 마지막 직전 시점의 지표 값.
    pub fn prev(&self, name: &str) -> Option<Decimal> {
        if self.bars.len() < 2 {
            return None;
        }
        self.value_at(name, self.bars.len() - 2)
    }

    /// 마지막 종가.
    pub fn latest_close(&self) -> Option<Decimal> {
        self.last_bar().map(|b| b.close)
    }

    /// 피보나치 되돌림 레벨.
    pub fn fibonacci(&self) -> &FibonacciLevels {
        &self.fibonacci
    }
}
