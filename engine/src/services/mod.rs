// Request / response types for the analysis service and the service itself.
// The types are plain serde structs so any transport can carry them.
use crate::analysis::AnalysisConfig;
use serde::{Deserialize, Serialize};
use shared::models::{AnalysisResult, TimeFrame};

pub mod analysis_service;

pub use analysis_service::AnalysisService;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCsvRequest {
    pub file_path: String,
    pub symbol: String,
    pub timeframe: TimeFrame,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadCsvResponse {
    pub success: bool,
    pub message: String,
    pub candles_loaded: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub timeframe: TimeFrame,
    /// Analyse only the most recent `limit` candles.
    #[serde(default)]
    pub limit: Option<usize>,
    /// Overrides the service's default configuration.
    #[serde(default)]
    pub config: Option<AnalysisConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub symbol: String,
    pub timeframe: TimeFrame,
    pub candles_used: usize,
    pub result: AnalysisResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorRequest {
    pub symbol: String,
    pub timeframe: TimeFrame,
    pub indicator_type: String,
    /// JSON object, e.g. `{"period": 14}`. Empty means defaults.
    #[serde(default)]
    pub parameters: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorResponse {
    pub indicator_name: String,
    pub values: Vec<Option<f64>>,
}
