// Exponential Moving Average (EMA) indicator implementation
use super::{closes, IndicatorCalculator};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::Candle;

/// How the first EMA value is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmaSeeding {
    /// Seed with the simple average of the first `period` values.
    #[default]
    SmaSeed,
    /// Seed with the first raw value and smooth from index 1 onward.
    FirstValue,
}

/// Seeding used everywhere unless a configuration asks otherwise.
pub const EMA_SEEDING: EmaSeeding = EmaSeeding::SmaSeed;

/// EMA series aligned with `values`.
///
/// With [`EmaSeeding::SmaSeed`] the first defined entry is at `period - 1`.
/// With [`EmaSeeding::FirstValue`] every entry is defined. Either way the
/// whole series is `None` when `values.len() < period` or `period == 0`.
pub fn ema_series(values: &[f64], period: usize, seeding: EmaSeeding) -> Vec<Option<f64>> {
    if period == 0 || values.len() < period {
        return vec![None; values.len()];
    }

    let k = 2.0 / (period as f64 + 1.0);
    let (start, mut previous, mut results) = match seeding {
        EmaSeeding::SmaSeed => {
            let seed = values[..period].iter().sum::<f64>() / period as f64;
            let mut results = vec![None; period - 1];
            results.push(Some(seed));
            (period, seed, results)
        }
        EmaSeeding::FirstValue => (1, values[0], vec![Some(values[0])]),
    };
    results.reserve(values.len() - start);

    for &value in &values[start..] {
        let ema = value * k + previous * (1.0 - k);
        results.push(Some(ema));
        previous = ema;
    }
    results
}

/// Latest EMA value using the canonical seeding.
pub fn compute_ema(values: &[f64], period: usize) -> Option<f64> {
    compute_ema_with(values, period, EMA_SEEDING)
}

pub fn compute_ema_with(values: &[f64], period: usize, seeding: EmaSeeding) -> Option<f64> {
    ema_series(values, period, seeding).last().copied().flatten()
}

pub struct Ema {
    name: String,
    period: usize,
    seeding: EmaSeeding,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self::with_seeding(period, EMA_SEEDING)
    }

    pub fn with_seeding(period: usize, seeding: EmaSeeding) -> Self {
        Self {
            name: format!("EMA({})", period),
            period,
            seeding,
        }
    }
}

impl IndicatorCalculator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period, "seeding": self.seeding })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        ema_series(&closes(data), self.period, self.seeding)
    }
}
