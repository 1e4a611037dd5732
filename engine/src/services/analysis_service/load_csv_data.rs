// Handler for LoadCsvData
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::data::csv_parser::CandleCsvParser;
use crate::data::market_data::MarketDataStore;
use crate::error::Result;
use crate::services::{LoadCsvRequest, LoadCsvResponse};

pub async fn handle_load_csv_data(
    req_payload: LoadCsvRequest,
    market_data_store: Arc<RwLock<MarketDataStore>>,
) -> Result<LoadCsvResponse> {
    let candles = CandleCsvParser::load_candles_from_csv(&req_payload.file_path).map_err(|e| {
        tracing::error!(path = %req_payload.file_path, error_detail = %e, "Failed to load candle CSV");
        e
    })?;

    let candles_loaded = candles.len();
    let mut store = market_data_store.write().await;
    let stored = store.add_candles(&req_payload.symbol, req_payload.timeframe, candles)?;
    drop(store);

    tracing::info!(
        symbol = %req_payload.symbol,
        timeframe = %req_payload.timeframe,
        loaded = candles_loaded,
        stored,
        "Stored CSV candles"
    );
    Ok(LoadCsvResponse {
        success: true,
        message: format!(
            "Loaded {} candles for symbol {} ({})",
            candles_loaded, req_payload.symbol, req_payload.timeframe
        ),
        candles_loaded,
    })
}
