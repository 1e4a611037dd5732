// In-memory candle store keyed by symbol and timeframe.
use crate::error::{EngineError, Result};
use chrono::{DateTime, Utc};
use shared::models::{Candle, TimeFrame};
use std::collections::HashMap;

pub struct MarketDataStore {
    data: HashMap<String, HashMap<TimeFrame, Vec<Candle>>>,
}

impl MarketDataStore {
    pub fn new() -> Self {
        MarketDataStore {
            data: HashMap::new(),
        }
    }

    /// Merges `new_candles` into the series, keeping it sorted with one candle
    /// per timestamp. A later candle replaces an earlier one with the same timestamp.
    pub fn add_candles(&mut self, symbol: &str, timeframe: TimeFrame, new_candles: Vec<Candle>) -> Result<usize> {
        if symbol.trim().is_empty() {
            return Err(EngineError::MarketDataError("Symbol must not be empty".to_string()));
        }
        let series = self
            .data
            .entry(symbol.to_string())
            .or_default()
            .entry(timeframe)
            .or_default();

        // Latest copy of each timestamp goes first so the stable sort and dedup keep it.
        let mut merged: Vec<Candle> = new_candles.into_iter().rev().chain(series.drain(..).rev()).collect();
        merged.sort_by_key(|c| c.timestamp);
        merged.dedup_by_key(|c| c.timestamp);
        *series = merged;
        Ok(series.len())
    }

    pub fn get_candles(
        &self,
        symbol: &str,
        timeframe: TimeFrame,
        from_timestamp: Option<DateTime<Utc>>,
        to_timestamp: Option<DateTime<Utc>>,
    ) -> Option<Vec<Candle>> {
        self.data
            .get(symbol)
            .and_then(|symbol_data| symbol_data.get(&timeframe))
            .map(|candles| {
                candles
                    .iter()
                    .filter(|c| from_timestamp.map_or(true, |start| c.timestamp >= start))
                    .filter(|c| to_timestamp.map_or(true, |end| c.timestamp <= end))
                    .copied()
                    .collect()
            })
    }

    /// The most recent `limit` candles, oldest-first.
    pub fn latest(&self, symbol: &str, timeframe: TimeFrame, limit: usize) -> Option<Vec<Candle>> {
        self.data
            .get(symbol)
            .and_then(|symbol_data| symbol_data.get(&timeframe))
            .map(|candles| candles[candles.len().saturating_sub(limit)..].to_vec())
    }

    pub fn len(&self, symbol: &str, timeframe: TimeFrame) -> usize {
        self.data
            .get(symbol)
            .and_then(|symbol_data| symbol_data.get(&timeframe))
            .map_or(0, Vec::len)
    }

    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.data.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }
}

impl Default for MarketDataStore {
    fn default() -> Self {
        Self::new()
    }
}
