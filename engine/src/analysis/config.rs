// Analysis parameters and the history they require.
use crate::analysis::signal::SignalStrategy;
use crate::error::{EngineError, Result};
use crate::indicators::trend::{PRICE_ACTION_LOOKBACK, VOLUME_BLOCK};
use crate::indicators::{EmaSeeding, EMA_SEEDING};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdConfig {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        MacdConfig { fast: 12, slow: 26, signal: 9 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiThresholds {
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiThresholds {
    fn default() -> Self {
        RsiThresholds { oversold: 30.0, overbought: 70.0 }
    }
}

impl RsiThresholds {
    pub fn label(&self, rsi: f64) -> &'static str {
        if rsi < self.oversold {
            "Oversold"
        } else if rsi > self.overbought {
            "Overbought"
        } else {
            "Neutral"
        }
    }
}

/// Fields missing from a JSON document take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub ema_fast_period: usize,
    pub ema_slow_period: usize,
    pub sma_period: usize,
    pub rsi_period: usize,
    pub macd: MacdConfig,
    pub support_resistance_window: usize,
    pub rsi_thresholds: RsiThresholds,
    pub ema_seeding: EmaSeeding,
    pub strategy: SignalStrategy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            ema_fast_period: 9,
            ema_slow_period: 12,
            sma_period: 50,
            rsi_period: 14,
            macd: MacdConfig::default(),
            support_resistance_window: 20,
            rsi_thresholds: RsiThresholds::default(),
            ema_seeding: EMA_SEEDING,
            strategy: SignalStrategy::default(),
        }
    }
}

/// The largest history any indicator needs, and which indicator needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRequirement {
    pub indicator: &'static str,
    pub required: usize,
}

impl AnalysisConfig {
    /// Rejects zero periods and inverted fast/slow pairs. Nothing is corrected.
    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("ema_fast_period", self.ema_fast_period),
            ("ema_slow_period", self.ema_slow_period),
            ("sma_period", self.sma_period),
            ("rsi_period", self.rsi_period),
            ("macd.fast", self.macd.fast),
            ("macd.slow", self.macd.slow),
            ("macd.signal", self.macd.signal),
            ("support_resistance_window", self.support_resistance_window),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(EngineError::InvalidConfig(format!("{} must be a positive integer", name)));
        }
        if self.ema_fast_period >= self.ema_slow_period {
            return Err(EngineError::InvalidConfig(format!(
                "ema_fast_period ({}) must be below ema_slow_period ({})",
                self.ema_fast_period, self.ema_slow_period
            )));
        }
        if self.macd.fast >= self.macd.slow {
            return Err(EngineError::InvalidConfig(format!(
                "macd.fast ({}) must be below macd.slow ({})",
                self.macd.fast, self.macd.slow
            )));
        }
        let t = self.rsi_thresholds;
        if !(0.0..=100.0).contains(&t.oversold) || !(0.0..=100.0).contains(&t.overbought) || t.oversold >= t.overbought {
            return Err(EngineError::InvalidConfig(format!(
                "rsi thresholds must satisfy 0 <= oversold ({}) < overbought ({}) <= 100",
                t.oversold, t.overbought
            )));
        }
        Ok(())
    }

    pub fn min_history(&self) -> HistoryRequirement {
        let requirements = [
            ("EMA slow", self.ema_slow_period),
            ("EMA fast", self.ema_fast_period),
            ("SMA", self.sma_period),
            ("RSI", self.rsi_period.saturating_add(1)),
            ("MACD", self.macd.slow.saturating_add(self.macd.signal)),
            ("support/resistance", self.support_resistance_window),
            ("price action", PRICE_ACTION_LOOKBACK + 1),
            ("volume trend", 2 * VOLUME_BLOCK),
        ];
        let mut best = HistoryRequirement { indicator: requirements[0].0, required: requirements[0].1 };
        for &(indicator, required) in &requirements[1..] {
            if required > best.required {
                best = HistoryRequirement { indicator, required };
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.ema_fast_period, 9);
        assert_eq!(config.ema_slow_period, 12);
        assert_eq!(config.sma_period, 50);
        assert_eq!(config.rsi_period, 14);
        assert_eq!(config.macd, MacdConfig { fast: 12, slow: 26, signal: 9 });
        assert_eq!(config.support_resistance_window, 20);
        assert_eq!(config.ema_seeding, EmaSeeding::SmaSeed);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_history_default_is_driven_by_sma() {
        let req = AnalysisConfig::default().min_history();
        assert_eq!(req, HistoryRequirement { indicator: "SMA", required: 50 });
    }

    #[test]
    fn test_min_history_macd_driven() {
        let config = AnalysisConfig { sma_period: 20, ..AnalysisConfig::default() };
        assert_eq!(config.min_history(), HistoryRequirement { indicator: "MACD", required: 35 });
    }

    #[test]
    fn test_min_history_never_below_volume_window() {
        let config = AnalysisConfig {
            ema_fast_period: 2,
            ema_slow_period: 3,
            sma_period: 2,
            rsi_period: 2,
            macd: MacdConfig { fast: 2, slow: 3, signal: 2 },
            support_resistance_window: 2,
            ..AnalysisConfig::default()
        };
        assert_eq!(config.min_history(), HistoryRequirement { indicator: "volume trend", required: 10 });
    }

    #[test]
    fn test_min_history_saturates_on_huge_periods() {
        let config: AnalysisConfig =
            serde_json::from_str(&format!(r#"{{ "macd": {{ "fast": 12, "slow": {}, "signal": 9 }} }}"#, usize::MAX)).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_history(), HistoryRequirement { indicator: "MACD", required: usize::MAX });

        let rsi = AnalysisConfig { rsi_period: usize::MAX, ..AnalysisConfig::default() };
        assert_eq!(rsi.min_history(), HistoryRequirement { indicator: "RSI", required: usize::MAX });
    }

    #[test]
    fn test_validate_rejects_zero_period() {
        let config = AnalysisConfig { rsi_period: 0, ..AnalysisConfig::default() };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(ref m) if m.contains("rsi_period")));
    }

    #[test]
    fn test_validate_rejects_inverted_ema() {
        let config = AnalysisConfig { ema_fast_period: 21, ema_slow_period: 9, ..AnalysisConfig::default() };
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
        let equal = AnalysisConfig { ema_fast_period: 12, ema_slow_period: 12, ..AnalysisConfig::default() };
        assert!(equal.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_macd() {
        let config = AnalysisConfig { macd: MacdConfig { fast: 26, slow: 12, signal: 9 }, ..AnalysisConfig::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("macd.fast"));
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let config = AnalysisConfig {
            rsi_thresholds: RsiThresholds { oversold: 70.0, overbought: 30.0 },
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "ema_slow_period": 21, "strategy": "macd-momentum" }"#).unwrap();
        assert_eq!(config.ema_slow_period, 21);
        assert_eq!(config.ema_fast_period, 9);
        assert_eq!(config.strategy, SignalStrategy::MacdMomentum);
    }

    #[test]
    fn test_rsi_labels() {
        let t = RsiThresholds::default();
        assert_eq!(t.label(25.0), "Oversold");
        assert_eq!(t.label(75.0), "Overbought");
        assert_eq!(t.label(30.0), "Neutral");
        assert_eq!(t.label(70.0), "Neutral");
    }
}
