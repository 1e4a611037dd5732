// Technical indicators module
pub mod ema;
pub mod levels;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod trend;

pub use ema::{compute_ema, ema_series, Ema, EmaSeeding, EMA_SEEDING};
pub use levels::{support_resistance, SupportResistance};
pub use macd::{compute_macd, macd_series, Macd, MacdSeries};
pub use rsi::{compute_rsi, rsi_series, Rsi, RSI_LOSS_EPSILON};
pub use sma::{compute_sma, sma_series, Sma};
pub use trend::{price_action_trend, volume_trend};

use crate::error::{EngineError, Result};
use serde_json::Value;
use shared::models::{Candle, IndicatorSeries};

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    /// One entry per candle; `None` where the indicator is still warming up.
    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>>;

    fn series(&self, data: &[Candle]) -> IndicatorSeries {
        IndicatorSeries {
            name: self.name().to_string(),
            parameters: self.parameters(),
            values: self.calculate(data),
        }
    }
}

pub(crate) fn closes(data: &[Candle]) -> Vec<f64> {
    data.iter().map(|c| c.close).collect()
}

fn period_param(params: &Value, key: &str, default: usize) -> Result<usize> {
    let period = match params.get(key) {
        None | Some(Value::Null) => default,
        Some(v) => v
            .as_u64()
            .ok_or_else(|| EngineError::IndicatorError(format!("Parameter '{}' must be a positive integer, got {}", key, v)))?
            as usize,
    };
    if period == 0 {
        return Err(EngineError::IndicatorError(format!("Indicator parameter '{}' cannot be 0", key)));
    }
    Ok(period)
}

/// Builds a calculator from its type name (`sma`, `ema`, `rsi`, `macd`) and JSON parameters.
/// Missing parameters fall back to the usual defaults.
pub fn build_calculator(indicator_type: &str, params: &Value) -> Result<Box<dyn IndicatorCalculator>> {
    let calculator: Box<dyn IndicatorCalculator> = match indicator_type.trim().to_lowercase().as_str() {
        "sma" => Box::new(Sma::new(period_param(params, "period", 20)?)),
        "ema" => Box::new(Ema::new(period_param(params, "period", 20)?)),
        "rsi" => Box::new(Rsi::new(period_param(params, "period", 14)?)),
        "macd" => {
            let fast = period_param(params, "fast", 12)?;
            let slow = period_param(params, "slow", 26)?;
            let signal = period_param(params, "signal", 9)?;
            if fast >= slow {
                return Err(EngineError::IndicatorError(format!(
                    "MACD fast period ({}) must be below slow period ({})",
                    fast, slow
                )));
            }
            Box::new(Macd::new(fast, slow, signal))
        }
        other => {
            return Err(EngineError::IndicatorError(format!("Unknown indicator type: {}", other)));
        }
    };
    Ok(calculator)
}
