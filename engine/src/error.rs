use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient data for {indicator}: need at least {required} candles, got {actual}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid candle at index {index}: {reason}")]
    InvalidCandle { index: usize, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("Market data store error: {0}")]
    MarketDataError(String),

    #[error("Indicator calculation error: {0}")]
    IndicatorError(String),

    #[error("Internal processing error: {0}")]
    ProcessingError(String),
}

impl EngineError {
    /// Errors the caller can resolve by supplying more or cleaner candles.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            EngineError::InsufficientData { .. }
                | EngineError::InvalidCandle { .. }
                | EngineError::CsvDataFormatError(_)
                | EngineError::MarketDataError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = EngineError::InsufficientData { indicator: "SMA(50)", required: 50, actual: 12 };
        assert_eq!(err.to_string(), "Insufficient data for SMA(50): need at least 50 candles, got 12");
        assert!(err.is_data_error());
    }

    #[test]
    fn test_invalid_config_is_not_data_error() {
        let err = EngineError::InvalidConfig("ema_fast_period must be below ema_slow_period".into());
        assert!(!err.is_data_error());
        assert!(err.to_string().starts_with("Invalid configuration:"));
    }
}
