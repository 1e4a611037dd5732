// services/analysis_service/mod.rs
// AnalysisService owns the candle store and dispatches each request to its handler.
use super::{
    AnalysisRequest, AnalysisResponse, IndicatorRequest, IndicatorResponse, LoadCsvRequest, LoadCsvResponse,
};
use crate::analysis::AnalysisConfig;
use crate::data::market_data::MarketDataStore;
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod calculate_indicator;
pub mod load_csv_data;
pub mod run_analysis;

pub struct AnalysisService {
    market_data_store: Arc<RwLock<MarketDataStore>>,
    default_config: AnalysisConfig,
}

impl AnalysisService {
    pub fn new(market_data_store: Arc<RwLock<MarketDataStore>>, default_config: AnalysisConfig) -> Self {
        AnalysisService { market_data_store, default_config }
    }

    pub fn market_data_store(&self) -> Arc<RwLock<MarketDataStore>> {
        self.market_data_store.clone()
    }

    pub async fn load_csv_data(&self, request: LoadCsvRequest) -> Result<LoadCsvResponse> {
        tracing::info!(
            symbol = %request.symbol,
            timeframe = %request.timeframe,
            path = %request.file_path,
            "Received LoadCsvRequest, dispatching to handler."
        );
        load_csv_data::handle_load_csv_data(request, self.market_data_store.clone()).await
    }

    pub async fn run_analysis(&self, request: AnalysisRequest) -> Result<AnalysisResponse> {
        tracing::info!(
            symbol = %request.symbol,
            timeframe = %request.timeframe,
            limit = ?request.limit,
            custom_config = request.config.is_some(),
            "Received AnalysisRequest, dispatching to handler."
        );
        run_analysis::handle_run_analysis(request, self.market_data_store.clone(), &self.default_config).await
    }

    pub async fn calculate_indicator(&self, request: IndicatorRequest) -> Result<IndicatorResponse> {
        tracing::info!(
            symbol = %request.symbol,
            timeframe = %request.timeframe,
            indicator_type = %request.indicator_type,
            parameters = %request.parameters,
            "Received IndicatorRequest, dispatching to handler."
        );
        calculate_indicator::handle_calculate_indicator(request, self.market_data_store.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SignalStrategy;
    use crate::error::EngineError;
    use shared::models::{Candle, Signal, TimeFrame};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_service() -> AnalysisService {
        AnalysisService::new(Arc::new(RwLock::new(MarketDataStore::new())), AnalysisConfig::default())
    }

    fn rising_candles(n: i64) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64;
                Candle::from_millis(1_700_000_000_000 + i * 60_000, close, close + 1.0, close - 1.0, close, 500.0).unwrap()
            })
            .collect()
    }

    async fn create_test_service_with_candles(symbol: &str, candles: Vec<Candle>) -> AnalysisService {
        let service = create_test_service();
        let store = service.market_data_store();
        store.write().await.add_candles(symbol, TimeFrame::Minute1, candles).unwrap();
        service
    }

    fn create_dummy_csv(rows: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "timestamp,open,high,low,close,volume").unwrap();
        for i in 0..rows {
            let close = 100.0 + i as f64;
            writeln!(file, "{},{},{},{},{},{}", 1_700_000_000_000u64 + i as u64 * 60_000, close, close + 1.0, close - 1.0, close, 500).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_csv_data_success() {
        let service = create_test_service();
        let tmp_file = create_dummy_csv(3);
        let request = LoadCsvRequest {
            file_path: tmp_file.path().to_str().unwrap().to_string(),
            symbol: "BTCUSDT".to_string(),
            timeframe: TimeFrame::Minute1,
        };
        let response = service.load_csv_data(request).await.unwrap();
        assert!(response.success);
        assert_eq!(response.candles_loaded, 3);
        assert!(response.message.contains("Loaded 3 candles"));
        assert_eq!(service.market_data_store().read().await.len("BTCUSDT", TimeFrame::Minute1), 3);
    }

    #[tokio::test]
    async fn test_load_csv_data_file_not_found() {
        let service = create_test_service();
        let request = LoadCsvRequest {
            file_path: "non_existent_file.csv".to_string(),
            symbol: "BTCUSDT".to_string(),
            timeframe: TimeFrame::Minute1,
        };
        let err = service.load_csv_data(request).await.unwrap_err();
        assert!(matches!(err, EngineError::IoError { .. }));
        assert!(err.to_string().contains("I/O error"));
    }

    #[tokio::test]
    async fn test_run_analysis_end_to_end_from_csv() {
        let service = create_test_service();
        let tmp_file = create_dummy_csv(60);
        service
            .load_csv_data(LoadCsvRequest {
                file_path: tmp_file.path().to_str().unwrap().to_string(),
                symbol: "BTCUSDT".to_string(),
                timeframe: TimeFrame::Minute1,
            })
            .await
            .unwrap();

        let response = service
            .run_analysis(AnalysisRequest {
                symbol: "BTCUSDT".to_string(),
                timeframe: TimeFrame::Minute1,
                limit: None,
                config: None,
            })
            .await
            .unwrap();
        assert_eq!(response.candles_used, 60);
        assert_eq!(response.result.price, 159.0);
        assert_eq!(response.result.signal, Signal::Sell); // steady rise, RSI overbought
    }

    #[tokio::test]
    async fn test_run_analysis_no_market_data() {
        let service = create_test_service();
        let err = service
            .run_analysis(AnalysisRequest {
                symbol: "NODATA".to_string(),
                timeframe: TimeFrame::Hour1,
                limit: None,
                config: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::MarketDataError(ref m) if m.contains("not found")));
    }

    #[tokio::test]
    async fn test_run_analysis_limit_too_small_is_insufficient() {
        let service = create_test_service_with_candles("ETHUSDT", rising_candles(80)).await;
        let err = service
            .run_analysis(AnalysisRequest {
                symbol: "ETHUSDT".to_string(),
                timeframe: TimeFrame::Minute1,
                limit: Some(30),
                config: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientData { required: 50, actual: 30, .. }));
    }

    #[tokio::test]
    async fn test_run_analysis_custom_config() {
        let service = create_test_service_with_candles("ETHUSDT", rising_candles(80)).await;
        let config = AnalysisConfig { strategy: SignalStrategy::MacdMomentum, ..AnalysisConfig::default() };
        let response = service
            .run_analysis(AnalysisRequest {
                symbol: "ETHUSDT".to_string(),
                timeframe: TimeFrame::Minute1,
                limit: Some(60),
                config: Some(config),
            })
            .await
            .unwrap();
        assert_eq!(response.candles_used, 60);
        assert_eq!(response.result.strategy, "macd-momentum");
        assert_eq!(response.result.price, 179.0);
    }

    #[tokio::test]
    async fn test_run_analysis_invalid_config() {
        let service = create_test_service_with_candles("ETHUSDT", rising_candles(80)).await;
        let config = AnalysisConfig { ema_fast_period: 30, ..AnalysisConfig::default() };
        let err = service
            .run_analysis(AnalysisRequest {
                symbol: "ETHUSDT".to_string(),
                timeframe: TimeFrame::Minute1,
                limit: None,
                config: Some(config),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_calculate_indicator_sma() {
        let service = create_test_service_with_candles("SOLUSDT", rising_candles(5)).await;
        let response = service
            .calculate_indicator(IndicatorRequest {
                symbol: "SOLUSDT".to_string(),
                timeframe: TimeFrame::Minute1,
                indicator_type: "sma".to_string(),
                parameters: r#"{"period": 3}"#.to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.indicator_name, "SMA(3)");
        assert_eq!(response.values, vec![None, None, Some(101.0), Some(102.0), Some(103.0)]);
    }

    #[tokio::test]
    async fn test_calculate_indicator_default_parameters() {
        let service = create_test_service_with_candles("SOLUSDT", rising_candles(20)).await;
        let response = service
            .calculate_indicator(IndicatorRequest {
                symbol: "SOLUSDT".to_string(),
                timeframe: TimeFrame::Minute1,
                indicator_type: "rsi".to_string(),
                parameters: String::new(),
            })
            .await
            .unwrap();
        assert_eq!(response.indicator_name, "RSI(14)");
        assert_eq!(response.values.len(), 20);
    }

    #[tokio::test]
    async fn test_calculate_indicator_bad_parameters() {
        let service = create_test_service_with_candles("SOLUSDT", rising_candles(5)).await;
        let err = service
            .calculate_indicator(IndicatorRequest {
                symbol: "SOLUSDT".to_string(),
                timeframe: TimeFrame::Minute1,
                indicator_type: "ema".to_string(),
                parameters: "{not json".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::ProcessingError(ref m) if m.contains("Invalid JSON parameters")));
    }

    #[tokio::test]
    async fn test_calculate_indicator_unknown_type() {
        let service = create_test_service_with_candles("SOLUSDT", rising_candles(5)).await;
        let err = service
            .calculate_indicator(IndicatorRequest {
                symbol: "SOLUSDT".to_string(),
                timeframe: TimeFrame::Minute1,
                indicator_type: "ichimoku".to_string(),
                parameters: String::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::IndicatorError(_)));
    }
}
