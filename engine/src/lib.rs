// Engine library root
// Candle indicators, signal derivation and the async service around them.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod services;

pub use analysis::{analyze, AnalysisConfig, IndicatorEngine, SignalStrategy};
pub use error::{EngineError, Result};
