// Handler for RunAnalysis
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::analysis::{AnalysisConfig, IndicatorEngine};
use crate::data::market_data::MarketDataStore;
use crate::error::{EngineError, Result};
use crate::services::{AnalysisRequest, AnalysisResponse};

pub async fn handle_run_analysis(
    req_payload: AnalysisRequest,
    market_data_store: Arc<RwLock<MarketDataStore>>,
    default_config: &AnalysisConfig,
) -> Result<AnalysisResponse> {
    let config = req_payload.config.clone().unwrap_or_else(|| default_config.clone());
    let engine = IndicatorEngine::new(config)?;

    let store = market_data_store.read().await;
    let candles = match req_payload.limit {
        Some(limit) => store.latest(&req_payload.symbol, req_payload.timeframe, limit),
        None => store.get_candles(&req_payload.symbol, req_payload.timeframe, None, None),
    };
    drop(store);

    let candles = match candles {
        Some(c) if !c.is_empty() => c,
        _ => {
            tracing::warn!(
                symbol = %req_payload.symbol,
                timeframe = %req_payload.timeframe,
                "No candle data found for analysis"
            );
            return Err(EngineError::MarketDataError(format!(
                "Candle data for symbol '{}' and timeframe {} not found",
                req_payload.symbol, req_payload.timeframe
            )));
        }
    };

    let result = engine.analyze(&candles).map_err(|e| {
        tracing::warn!(symbol = %req_payload.symbol, candles = candles.len(), error_detail = %e, "Analysis failed");
        e
    })?;

    tracing::info!(
        symbol = %req_payload.symbol,
        timeframe = %req_payload.timeframe,
        signal = %result.signal,
        position = %result.open_position,
        strategy = %result.strategy,
        "Analysis complete"
    );
    Ok(AnalysisResponse {
        symbol: req_payload.symbol,
        timeframe: req_payload.timeframe,
        candles_used: candles.len(),
        result,
    })
}
