// Engine settings, loaded from a JSON file and environment overrides
use crate::analysis::AnalysisConfig;
use crate::error::{EngineError, Result};
use serde::Deserialize;
use shared::models::TimeFrame;
use std::path::Path;

pub const CONFIG_PATH_VAR: &str = "ENGINE_CONFIG";
pub const CSV_PATH_VAR: &str = "ENGINE_CSV_PATH";
pub const SYMBOL_VAR: &str = "ENGINE_SYMBOL";
pub const TIMEFRAME_VAR: &str = "ENGINE_TIMEFRAME";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    /// Candle file analysed by the binary.
    pub csv_path: Option<String>,
    pub symbol: String,
    pub timeframe: TimeFrame,
    /// Analyse only the most recent candles when set.
    pub analysis_limit: Option<usize>,
    pub analysis: AnalysisConfig,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            csv_path: None,
            symbol: "BTCUSDT".to_string(),
            timeframe: TimeFrame::Hour1,
            analysis_limit: None,
            analysis: AnalysisConfig::default(),
        }
    }
}

impl EngineSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loading engine settings");
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let settings: EngineSettings =
            serde_json::from_str(raw).map_err(|e| EngineError::ConfigError(e.to_string()))?;
        settings.analysis.validate()?;
        Ok(settings)
    }

    /// Defaults, or the file named by `ENGINE_CONFIG`, then the per-field variables.
    pub fn from_env() -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = match lookup(CONFIG_PATH_VAR) {
            Some(path) => Self::load(&path)?,
            None => EngineSettings::default(),
        };
        settings.apply_overrides(lookup)?;
        Ok(settings)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(path) = lookup(CSV_PATH_VAR) {
            self.csv_path = Some(path);
        }
        if let Some(symbol) = lookup(SYMBOL_VAR) {
            self.symbol = symbol;
        }
        if let Some(raw) = lookup(TIMEFRAME_VAR) {
            self.timeframe = raw
                .parse()
                .map_err(|e| EngineError::ConfigError(format!("{}: {}", TIMEFRAME_VAR, e)))?;
        }
        Ok(())
    }
}
