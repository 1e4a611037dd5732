//! Turns a candle series into an [`AnalysisResult`](shared::models::AnalysisResult):
//! indicator snapshot, signal, stop-loss / take-profit and narrative.

pub mod config;
pub mod engine;
pub mod narrative;
pub mod signal;

pub use config::{AnalysisConfig, HistoryRequirement, MacdConfig, RsiThresholds};
pub use engine::{analyze, validate_candles, IndicatorEngine};
pub use narrative::build_narrative;
pub use signal::{
    derive_signal, derive_signal_with, stop_loss_take_profit, RuleOutcome, SignalContext, SignalDecision, SignalRule,
    SignalStrategy,
};
