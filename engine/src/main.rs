// Engine main entry point: load candles, run one analysis, print the result as JSON.
use anyhow::Context;
use indicator_engine::config::EngineSettings;
use indicator_engine::data::market_data::MarketDataStore;
use indicator_engine::services::{AnalysisRequest, AnalysisService, LoadCsvRequest};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting indicator engine...");

    let settings = EngineSettings::from_env().context("failed to load engine settings")?;
    let csv_path = settings
        .csv_path
        .clone()
        .or_else(|| std::env::args().nth(1))
        .context("no candle file given: set ENGINE_CSV_PATH, csv_path in ENGINE_CONFIG, or pass a path")?;
    info!(symbol = %settings.symbol, timeframe = %settings.timeframe, path = %csv_path, "Engine configured");

    let market_data_store = Arc::new(RwLock::new(MarketDataStore::new()));
    let service = AnalysisService::new(market_data_store, settings.analysis.clone());

    let loaded = service
        .load_csv_data(LoadCsvRequest {
            file_path: csv_path.clone(),
            symbol: settings.symbol.clone(),
            timeframe: settings.timeframe,
        })
        .await
        .with_context(|| format!("failed to load candles from {}", csv_path))?;
    info!(candles = loaded.candles_loaded, "{}", loaded.message);

    let response = service
        .run_analysis(AnalysisRequest {
            symbol: settings.symbol.clone(),
            timeframe: settings.timeframe,
            limit: settings.analysis_limit,
            config: None,
        })
        .await?;

    for line in &response.result.narrative {
        info!("{}", line);
    }
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
