// Relative Strength Index (RSI) indicator implementation
//
// Each value is recomputed from a single trailing window of `period`
// close-to-close differences rather than Wilder's smoothed recurrence.
use super::{closes, IndicatorCalculator};
use serde_json::Value;
use shared::models::Candle;

/// Stand-in for a zero loss sum so RS stays finite.
pub const RSI_LOSS_EPSILON: f64 = 1e-8;

pub const RSI_NEUTRAL: f64 = 50.0;

/// RSI over `window`, which holds `period + 1` consecutive closes.
fn rsi_of_window(window: &[f64]) -> f64 {
    let mut gains = 0.0;
    let mut losses = 0.0;
    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains += change;
        } else {
            losses -= change; // losses are positive values
        }
    }

    if gains == 0.0 && losses == 0.0 {
        return RSI_NEUTRAL;
    }
    let denominator = if losses == 0.0 { RSI_LOSS_EPSILON } else { losses };
    let rs = gains / denominator;
    100.0 - 100.0 / (1.0 + rs)
}

/// RSI of the most recent `period` differences. Needs `period + 1` closes.
pub fn compute_rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() <= period {
        return None;
    }
    Some(rsi_of_window(&closes[closes.len() - period - 1..]))
}

/// Rolling RSI aligned with `closes`; the first `period` entries are `None`.
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || closes.len() <= period {
        return vec![None; closes.len()];
    }
    let mut results = vec![None; period];
    results.extend(closes.windows(period + 1).map(|w| Some(rsi_of_window(w))));
    results
}

pub struct Rsi {
    name: String,
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self {
            name: format!("RSI({})", period),
            period,
        }
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        rsi_series(&closes(data), self.period)
    }
}
