// Moving Average Convergence Divergence (MACD)
//
//   line      = EMA(close, fast) - EMA(close, slow)
//   signal    = EMA(line, signal_period)
//   histogram = line - signal
use super::ema::{ema_series, EmaSeeding, EMA_SEEDING};
use super::{closes, IndicatorCalculator};
use serde_json::Value;
use shared::models::{Candle, MacdValues};

/// MACD series aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub fn macd_series(closes: &[f64], fast: usize, slow: usize, signal_period: usize, seeding: EmaSeeding) -> MacdSeries {
    let fast_ema = ema_series(closes, fast, seeding);
    let slow_ema = ema_series(closes, slow, seeding);

    let line: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    // The signal line only sees the defined part of the MACD line.
    let offset = line.iter().position(Option::is_some).unwrap_or(line.len());
    let defined: Vec<f64> = line[offset..].iter().flatten().copied().collect();
    let mut signal = vec![None; offset];
    signal.extend(ema_series(&defined, signal_period, seeding));

    let histogram = line
        .iter()
        .zip(&signal)
        .map(|(l, s)| match (l, s) {
            (Some(l), Some(s)) => Some(l - s),
            _ => None,
        })
        .collect();

    MacdSeries { line, signal, histogram }
}

/// Latest MACD values with canonical seeding. Every field is `None` when
/// `closes.len() < slow + signal_period`.
pub fn compute_macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdValues {
    compute_macd_with(closes, fast, slow, signal_period, EMA_SEEDING)
}

pub fn compute_macd_with(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
    seeding: EmaSeeding,
) -> MacdValues {
    if fast == 0 || slow == 0 || signal_period == 0 || closes.len() < slow.saturating_add(signal_period) {
        return MacdValues::default();
    }
    let series = macd_series(closes, fast, slow, signal_period, seeding);
    let latest = |v: &[Option<f64>]| v.last().copied().flatten();
    let line = latest(&series.line);
    let signal = latest(&series.signal);
    MacdValues {
        line,
        signal,
        histogram: line.zip(signal).map(|(l, s)| l - s),
    }
}

/// Histogram series; line and signal are available through [`macd_series`].
pub struct Macd {
    name: String,
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        Self {
            name: format!("MACD({},{},{})", fast, slow, signal),
            fast,
            slow,
            signal,
        }
    }
}

impl IndicatorCalculator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "fast": self.fast, "slow": self.slow, "signal": self.signal })
    }

    fn calculate(&self, data: &[Candle]) -> Vec<Option<f64>> {
        macd_series(&closes(data), self.fast, self.slow, self.signal, EMA_SEEDING).histogram
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::ema::compute_ema;

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    #[test]
    fn test_macd_line_is_ema_difference() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.3).collect();
        let macd = compute_macd(&closes, 12, 26, 9);
        let expected = compute_ema(&closes, 12).unwrap() - compute_ema(&closes, 26).unwrap();
        assert!((macd.line.unwrap() - expected).abs() < 1e-12);
        let histogram = macd.histogram.unwrap();
        assert!((histogram - (macd.line.unwrap() - macd.signal.unwrap())).abs() < 1e-12);
    }

    #[test]
    fn test_macd_signal_is_ema_of_line() {
        let closes = rising(20);
        let series = macd_series(&closes, 3, 6, 4, EMA_SEEDING);
        // Line defined from index slow - 1 = 5, signal from 5 + 4 - 1 = 8.
        assert!(series.line[4].is_none());
        assert!(series.line[5].is_some());
        assert!(series.signal[7].is_none());
        assert!(series.signal[8].is_some());

        let defined: Vec<f64> = series.line.iter().flatten().copied().collect();
        let expected_signal = compute_ema(&defined, 4).unwrap();
        assert!((series.signal[19].unwrap() - expected_signal).abs() < 1e-12);
    }

    #[test]
    fn test_macd_soft_fails_on_short_input() {
        let closes = rising(34);
        assert_eq!(compute_macd(&closes, 12, 26, 9), MacdValues::default());
        let enough = rising(35);
        let macd = compute_macd(&enough, 12, 26, 9);
        assert!(macd.line.is_some() && macd.signal.is_some() && macd.histogram.is_some());
    }

    #[test]
    fn test_macd_huge_periods_soft_fail() {
        assert_eq!(compute_macd(&rising(40), 12, usize::MAX, 9), MacdValues::default());
        assert_eq!(compute_macd(&rising(40), 12, 26, usize::MAX), MacdValues::default());
    }

    #[test]
    fn test_macd_uptrend_is_positive() {
        let macd = compute_macd(&rising(60), 12, 26, 9);
        assert!(macd.line.unwrap() > 0.0);
    }

    #[test]
    fn test_macd_flat_series_is_zero() {
        let macd = compute_macd(&[10.0; 40], 12, 26, 9);
        assert!(macd.line.unwrap().abs() < 1e-9);
        assert!(macd.histogram.unwrap().abs() < 1e-9);
    }
}
