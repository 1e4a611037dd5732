// Signal rules: map an indicator snapshot to BUY / SELL / HOLD / NONE.
//
// Each heuristic is a `SignalRule`. `SignalStrategy` names the built-in ones
// so a configuration file can pick one; callers can also hand the engine any
// other `SignalRule` implementation.
//
// The reversal overrides (overbought -> SELL, oversold -> BUY) are an
// assumption carried over from the scripts this engine replaces, not a
// verified trading strategy.
use crate::analysis::config::RsiThresholds;
use crate::indicators::SupportResistance;
use serde::{Deserialize, Serialize};
use shared::models::{IndicatorSet, OpenPosition, PriceTrend, Signal, StopLossTakeProfit, VolumeTrend};
use std::cmp::Ordering;

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalContext {
    pub indicators: IndicatorSet,
    pub price_action: PriceTrend,
    pub volume_trend: VolumeTrend,
    pub levels: SupportResistance,
    pub thresholds: RsiThresholds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub signal: Signal,
    pub reason: String,
}

impl RuleOutcome {
    fn new(signal: Signal, reason: impl Into<String>) -> Self {
        RuleOutcome { signal, reason: reason.into() }
    }
}

pub trait SignalRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn evaluate(&self, ctx: &SignalContext) -> RuleOutcome;
}

/// Full decision handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDecision {
    pub signal: Signal,
    pub open_position: OpenPosition,
    pub stop_loss_take_profit: Option<StopLossTakeProfit>,
    pub reason: String,
}

/// BUY stops at support and targets resistance; SELL the reverse.
pub fn stop_loss_take_profit(signal: Signal, levels: &SupportResistance) -> Option<StopLossTakeProfit> {
    match signal {
        Signal::Buy => Some(StopLossTakeProfit { stop_loss: levels.support, take_profit: levels.resistance }),
        Signal::Sell => Some(StopLossTakeProfit { stop_loss: levels.resistance, take_profit: levels.support }),
        Signal::Hold | Signal::None => None,
    }
}

pub fn derive_signal(ctx: &SignalContext, strategy: SignalStrategy) -> SignalDecision {
    derive_signal_with(ctx, strategy.rule())
}

pub fn derive_signal_with(ctx: &SignalContext, rule: &dyn SignalRule) -> SignalDecision {
    let outcome = rule.evaluate(ctx);
    SignalDecision {
        signal: outcome.signal,
        open_position: OpenPosition::from_signal(outcome.signal),
        stop_loss_take_profit: stop_loss_take_profit(outcome.signal, &ctx.levels),
        reason: outcome.reason,
    }
}

/// Built-in rules selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalStrategy {
    #[default]
    EmaCrossReversal,
    EmaTrend,
    MacdMomentum,
    RsiThreshold,
    Confluence,
}

impl SignalStrategy {
    pub const ALL: [SignalStrategy; 5] = [
        SignalStrategy::EmaCrossReversal,
        SignalStrategy::EmaTrend,
        SignalStrategy::MacdMomentum,
        SignalStrategy::RsiThreshold,
        SignalStrategy::Confluence,
    ];

    pub fn rule(&self) -> &'static dyn SignalRule {
        match self {
            SignalStrategy::EmaCrossReversal => &EmaCrossReversal,
            SignalStrategy::EmaTrend => &EmaTrend,
            SignalStrategy::MacdMomentum => &MacdMomentum,
            SignalStrategy::RsiThreshold => &RsiThreshold,
            SignalStrategy::Confluence => &Confluence,
        }
    }

    pub fn name(&self) -> &'static str {
        self.rule().name()
    }
}

/// `None` when either EMA is missing.
fn ema_cross(indicators: &IndicatorSet) -> Option<Ordering> {
    let fast = indicators.ema_fast?;
    let slow = indicators.ema_slow?;
    fast.partial_cmp(&slow)
}

/// EMA cross direction with an RSI reversal override. The canonical rule.
pub struct EmaCrossReversal;

impl SignalRule for EmaCrossReversal {
    fn name(&self) -> &'static str {
        "ema-cross-reversal"
    }

    fn evaluate(&self, ctx: &SignalContext) -> RuleOutcome {
        let rsi = ctx.indicators.rsi;
        match ema_cross(&ctx.indicators) {
            Some(Ordering::Greater) => match rsi {
                Some(r) if r > ctx.thresholds.overbought => {
                    RuleOutcome::new(Signal::Sell, "EMA rising but RSI overbought, watch for a reversal")
                }
                _ => RuleOutcome::new(Signal::Buy, "EMA rising, bullish"),
            },
            Some(Ordering::Less) => match rsi {
                Some(r) if r < ctx.thresholds.oversold => {
                    RuleOutcome::new(Signal::Buy, "EMA falling but RSI oversold, watch for a reversal candle")
                }
                _ => RuleOutcome::new(Signal::Sell, "EMA falling, bearish"),
            },
            Some(Ordering::Equal) => RuleOutcome::new(Signal::None, "EMAs flat, no strong signal; wait for confirmation"),
            None => RuleOutcome::new(Signal::None, "EMA unavailable, no signal"),
        }
    }
}

/// EMA cross direction only.
pub struct EmaTrend;

impl SignalRule for EmaTrend {
    fn name(&self) -> &'static str {
        "ema-trend"
    }

    fn evaluate(&self, ctx: &SignalContext) -> RuleOutcome {
        match ema_cross(&ctx.indicators) {
            Some(Ordering::Greater) => RuleOutcome::new(Signal::Buy, "fast EMA above slow EMA"),
            Some(Ordering::Less) => RuleOutcome::new(Signal::Sell, "fast EMA below slow EMA"),
            Some(Ordering::Equal) => RuleOutcome::new(Signal::None, "EMAs flat"),
            None => RuleOutcome::new(Signal::None, "EMA unavailable"),
        }
    }
}

/// Sign of the MACD histogram.
pub struct MacdMomentum;

impl SignalRule for MacdMomentum {
    fn name(&self) -> &'static str {
        "macd-momentum"
    }

    fn evaluate(&self, ctx: &SignalContext) -> RuleOutcome {
        match ctx.indicators.macd.histogram {
            Some(h) if h > 0.0 => RuleOutcome::new(Signal::Buy, "MACD histogram positive"),
            Some(h) if h < 0.0 => RuleOutcome::new(Signal::Sell, "MACD histogram negative"),
            Some(_) => RuleOutcome::new(Signal::None, "MACD histogram flat"),
            None => RuleOutcome::new(Signal::None, "MACD unavailable"),
        }
    }
}

/// Mean reversion on RSI extremes.
pub struct RsiThreshold;

impl SignalRule for RsiThreshold {
    fn name(&self) -> &'static str {
        "rsi-threshold"
    }

    fn evaluate(&self, ctx: &SignalContext) -> RuleOutcome {
        match ctx.indicators.rsi {
            Some(r) if r < ctx.thresholds.oversold => RuleOutcome::new(Signal::Buy, "RSI oversold"),
            Some(r) if r > ctx.thresholds.overbought => RuleOutcome::new(Signal::Sell, "RSI overbought"),
            Some(_) => RuleOutcome::new(Signal::Hold, "RSI neutral"),
            None => RuleOutcome::new(Signal::None, "RSI unavailable"),
        }
    }
}

/// Votes from EMA cross, MACD histogram and price action; rising volume
/// adds one more vote in the prevailing direction.
pub struct Confluence;

impl Confluence {
    pub const THRESHOLD: i32 = 2;

    pub fn score(ctx: &SignalContext) -> i32 {
        let mut score: i32 = 0;
        score += match ema_cross(&ctx.indicators) {
            Some(Ordering::Greater) => 1,
            Some(Ordering::Less) => -1,
            _ => 0,
        };
        score += match ctx.indicators.macd.histogram {
            Some(h) if h > 0.0 => 1,
            Some(h) if h < 0.0 => -1,
            _ => 0,
        };
        score += match ctx.price_action {
            PriceTrend::Uptrend => 1,
            PriceTrend::Downtrend => -1,
            PriceTrend::Sideways => 0,
        };
        if ctx.volume_trend == VolumeTrend::Up {
            score += score.signum();
        }
        score
    }
}

impl SignalRule for Confluence {
    fn name(&self) -> &'static str {
        "confluence"
    }

    fn evaluate(&self, ctx: &SignalContext) -> RuleOutcome {
        let score = Confluence::score(ctx);
        if score >= Confluence::THRESHOLD {
            RuleOutcome::new(Signal::Buy, format!("bullish confluence (score {})", score))
        } else if score <= -Confluence::THRESHOLD {
            RuleOutcome::new(Signal::Sell, format!("bearish confluence (score {})", score))
        } else {
            RuleOutcome::new(Signal::Hold, format!("mixed indicators (score {})", score))
        }
    }
}
