// Pure analysis over an in-memory candle slice. Nothing here logs or does I/O;
// the caller decides what to do with errors.
use crate::analysis::config::AnalysisConfig;
use crate::analysis::narrative::build_narrative;
use crate::analysis::signal::{derive_signal_with, SignalContext, SignalRule};
use crate::error::{EngineError, Result};
use crate::indicators::ema::compute_ema_with;
use crate::indicators::macd::compute_macd_with;
use crate::indicators::{compute_rsi, compute_sma, price_action_trend, support_resistance, volume_trend};
use shared::models::{AnalysisResult, Candle, IndicatorSet, PriceTrend, VolumeTrend};

/// Checks the ordering and value invariants of a candle series.
pub fn validate_candles(candles: &[Candle]) -> Result<()> {
    for (index, candle) in candles.iter().enumerate() {
        let fields = [
            ("open", candle.open),
            ("high", candle.high),
            ("low", candle.low),
            ("close", candle.close),
            ("volume", candle.volume),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidCandle {
                    index,
                    reason: format!("{} must be finite and non-negative, got {}", name, value),
                });
            }
        }
        if index > 0 && candle.timestamp <= candles[index - 1].timestamp {
            return Err(EngineError::InvalidCandle {
                index,
                reason: format!(
                    "timestamp {} is not after previous {}",
                    candle.timestamp_millis(),
                    candles[index - 1].timestamp_millis()
                ),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    config: AnalysisConfig,
}

impl IndicatorEngine {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(IndicatorEngine { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Latest value of every configured indicator. Fields are `None` where
    /// `closes` is too short.
    pub fn indicators(&self, closes: &[f64]) -> IndicatorSet {
        let c = &self.config;
        IndicatorSet {
            ema_fast: compute_ema_with(closes, c.ema_fast_period, c.ema_seeding),
            ema_slow: compute_ema_with(closes, c.ema_slow_period, c.ema_seeding),
            sma: compute_sma(closes, c.sma_period),
            rsi: compute_rsi(closes, c.rsi_period),
            macd: compute_macd_with(closes, c.macd.fast, c.macd.slow, c.macd.signal, c.ema_seeding),
        }
    }

    /// Analyses `candles` with the configured strategy.
    pub fn analyze(&self, candles: &[Candle]) -> Result<AnalysisResult> {
        self.analyze_with(candles, self.config.strategy.rule())
    }

    /// Analyses `candles` with any signal rule, built-in or not.
    pub fn analyze_with(&self, candles: &[Candle], rule: &dyn SignalRule) -> Result<AnalysisResult> {
        let requirement = self.config.min_history();
        if candles.len() < requirement.required {
            return Err(EngineError::InsufficientData {
                indicator: requirement.indicator,
                required: requirement.required,
                actual: candles.len(),
            });
        }
        validate_candles(candles)?;

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();

        let indicators = self.indicators(&closes);
        let levels = support_resistance(&closes, self.config.support_resistance_window).ok_or(
            EngineError::InsufficientData {
                indicator: "support/resistance",
                required: self.config.support_resistance_window,
                actual: closes.len(),
            },
        )?;
        let price_action = price_action_trend(&closes).unwrap_or(PriceTrend::Sideways);
        let volume_trend = volume_trend(&volumes).unwrap_or(VolumeTrend::Stable);

        let ctx = SignalContext {
            indicators,
            price_action,
            volume_trend,
            levels,
            thresholds: self.config.rsi_thresholds,
        };
        let decision = derive_signal_with(&ctx, rule);
        let narrative = build_narrative(&self.config, &indicators, price_action, volume_trend, &decision, rule.name());

        // Non-empty: the length check above guarantees at least one candle.
        let last = candles[candles.len() - 1];
        Ok(AnalysisResult {
            signal: decision.signal,
            open_position: decision.open_position,
            stop_loss_take_profit: decision.stop_loss_take_profit,
            support: levels.support,
            resistance: levels.resistance,
            price: last.close,
            last_timestamp: last.timestamp,
            indicators,
            price_action,
            volume_trend,
            strategy: rule.name().to_string(),
            narrative,
        })
    }
}

/// One-shot analysis with an explicit configuration.
pub fn analyze(candles: &[Candle], config: &AnalysisConfig) -> Result<AnalysisResult> {
    IndicatorEngine::new(config.clone())?.analyze(candles)
}
