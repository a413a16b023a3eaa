//! 백테스트 서비스.
//!
//! 저장소에서 캔들을 읽어 시뮬레이션하고, 결과를 기록합니다.

use std::sync::Arc;

use tracing::{info, instrument};

use signal_core::types::{Ticker, Timeframe};
use signal_data::{BacktestStore, BarSource};
use signal_strategy::{mix_config, StrategyKind};

use crate::engine::BacktestEngine;
use crate::error::Result;
use crate::result::{BacktestParams, BacktestResult};

/// 캔들 소스와 기록 저장소를 묶은 백테스트 서비스.
pub struct BacktestService {
    source: Arc<dyn BarSource>,
    store: BacktestStore,
}

impl BacktestService {
    pub fn new(source: Arc<dyn BarSource>, store: BacktestStore) -> Self {
        Self { source, store }
    }

    /// 단일 전략 백테스트를 실행하고 결과를 저장합니다.
    #[instrument(skip(self, params))]
    pub async fn run_and_record(
        &self,
        ticker: &Ticker,
        timeframe: Timeframe,
        limit: usize,
        kind: StrategyKind,
        params: BacktestParams,
    ) -> Result<BacktestResult> {
        let bars = self.source.bars(ticker, timeframe, limit).await?;
        let result = BacktestEngine::new(params).run(&bars, kind)?;

        self.store.save(&result.to_record()?).await?;
        info!(ticker = %ticker, strategy = kind.as_str(), "백테스트 결과 기록");

        Ok(result)
    }

    /// 전략 조합 백테스트를 실행하고 결과를 저장합니다.
    #[instrument(skip(self, params))]
    pub async fn run_mix_and_record(
        &self,
        ticker: &Ticker,
        timeframe: Timeframe,
        limit: usize,
        mix_name: &str,
        params: BacktestParams,
    ) -> Result<BacktestResult> {
        let mix = mix_config(mix_name)?;
        let bars = self.source.bars(ticker, timeframe, limit).await?;
        let result = BacktestEngine::new(params).run_mix(&bars, &mix)?;

        self.store.save(&result.to_record()?).await?;
        info!(ticker = %ticker, mix = mix_name, "조합 백테스트 결과 기록");

        Ok(result)
    }

    /// 여러 전략을 비교 실행하고 모든 결과를 저장합니다.
    #[instrument(skip(self, params, kinds))]
    pub async fn compare_and_record(
        &self,
        ticker: &Ticker,
        timeframe: Timeframe,
        limit: usize,
        kinds: &[StrategyKind],
        params: BacktestParams,
    ) -> Result<Vec<BacktestResult>> {
        let bars = self.source.bars(ticker, timeframe, limit).await?;
        let engine = BacktestEngine::new(params);

        let results = engine.compare(&bars, kinds)?;
        for result in &results {
            self.store.save(&result.to_record()?).await?;
        }

        Ok(results)
    }
}
