// Handler for CalculateIndicator
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::data::market_data::MarketDataStore;
use crate::error::{EngineError, Result};
use crate::indicators::build_calculator;
use crate::services::{IndicatorRequest, IndicatorResponse};

pub async fn handle_calculate_indicator(
    req_payload: IndicatorRequest,
    market_data_store: Arc<RwLock<MarketDataStore>>,
) -> Result<IndicatorResponse> {
    let params: serde_json::Value = if req_payload.parameters.trim().is_empty() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_str(&req_payload.parameters).map_err(|e| {
            tracing::error!(
                indicator_type = %req_payload.indicator_type,
                parameters = %req_payload.parameters,
                error_detail = ?e,
                "Invalid JSON parameters for indicator"
            );
            EngineError::ProcessingError(format!(
                "Invalid JSON parameters for indicator '{}': {}",
                req_payload.indicator_type, e
            ))
        })?
    };
    let calculator = build_calculator(&req_payload.indicator_type, &params)?;

    let store = market_data_store.read().await;
    let candles = store.get_candles(&req_payload.symbol, req_payload.timeframe, None, None);
    drop(store); // release before computing

    let candle_data = match candles {
        Some(c) if !c.is_empty() => c,
        _ => {
            tracing::warn!(
                symbol = %req_payload.symbol,
                timeframe = %req_payload.timeframe,
                "No candle data found to calculate indicator"
            );
            return Err(EngineError::MarketDataError(format!(
                "Candle data for symbol '{}' and timeframe {} not found",
                req_payload.symbol, req_payload.timeframe
            )));
        }
    };

    let series = calculator.series(&candle_data);
    tracing::debug!(indicator = %series.name, points = series.values.len(), "Indicator calculated");
    Ok(IndicatorResponse {
        indicator_name: series.name,
        values: series.values,
    })
}
