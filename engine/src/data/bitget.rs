// Normalises Bitget mix-market kline responses into candles.
//
// Only the wire format lives here; fetching is left to the caller.
// Response shape:
//   { "code": "00000", "msg": "success", "data": [["1695835800000", "26210.5", "26210.5", "26194.5", "26194.5", "26.26", ...], ...] }
// Row fields: timestamp (ms), open, high, low, close, base volume, then extras we ignore.
use crate::error::{EngineError, Result};
use serde::Deserialize;
use serde_json::Value;
use shared::models::{Candle, TimeFrame};

pub const CANDLES_URL: &str = "https://api.bitget.com/api/v2/mix/market/candles";
pub const PRODUCT_TYPE: &str = "umcbl";
const SUCCESS_CODE: &str = "00000";

#[derive(Debug, Deserialize)]
struct CandlesResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<Vec<Vec<Value>>>,
}

pub fn candles_endpoint(symbol: &str, timeframe: TimeFrame, limit: usize) -> String {
    format!(
        "{}?symbol={}&granularity={}&productType={}&limit={}",
        CANDLES_URL,
        symbol,
        timeframe.exchange_granularity(),
        PRODUCT_TYPE,
        limit
    )
}

fn number_at(row: &[Value], column: usize, name: &str, row_index: usize) -> Result<f64> {
    let value = row.get(column).ok_or_else(|| {
        EngineError::MarketDataError(format!("Kline row {} is missing '{}' (column {})", row_index, name, column))
    })?;
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        EngineError::MarketDataError(format!("Kline row {} has a non-numeric '{}': {}", row_index, name, value))
    })
}

fn timestamp_at(row: &[Value], row_index: usize) -> Result<i64> {
    let value = row.first().ok_or_else(|| {
        EngineError::MarketDataError(format!("Kline row {} is missing 'timestamp'", row_index))
    })?;
    let parsed = match value {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        EngineError::MarketDataError(format!("Kline row {} has a non-integer 'timestamp': {}", row_index, value))
    })
}

pub fn parse_kline_row(row: &[Value], row_index: usize) -> Result<Candle> {
    let timestamp = timestamp_at(row, row_index)?;
    let open = number_at(row, 1, "open", row_index)?;
    let high = number_at(row, 2, "high", row_index)?;
    let low = number_at(row, 3, "low", row_index)?;
    let close = number_at(row, 4, "close", row_index)?;
    let volume = number_at(row, 5, "volume", row_index)?;
    Candle::from_millis(timestamp, open, high, low, close, volume).ok_or_else(|| {
        EngineError::MarketDataError(format!("Kline row {} has an out-of-range timestamp {}", row_index, timestamp))
    })
}

/// Parses a candles response and returns the `limit` most recent candles, oldest-first.
/// Fewer than `limit` rows is an error: the indicators would not be valid.
pub fn parse_candles_response(body: &str, limit: usize) -> Result<Vec<Candle>> {
    let response: CandlesResponse = serde_json::from_str(body)
        .map_err(|e| EngineError::MarketDataError(format!("Malformed candles response: {}", e)))?;

    if let Some(code) = response.code.as_deref() {
        if code != SUCCESS_CODE {
            return Err(EngineError::MarketDataError(format!(
                "Exchange returned code {}: {}",
                code,
                response.msg.as_deref().unwrap_or("unknown error")
            )));
        }
    }

    let rows = response.data.unwrap_or_default();
    let mut candles = rows
        .iter()
        .enumerate()
        .map(|(i, row)| parse_kline_row(row, i))
        .collect::<Result<Vec<_>>>()?;

    // Row order differs between endpoints; sort rather than trust it.
    // Reversed first so the stable sort and dedup keep the last-listed duplicate.
    candles.reverse();
    candles.sort_by_key(|c| c.timestamp);
    candles.dedup_by_key(|c| c.timestamp);

    if candles.is_empty() || candles.len() < limit {
        return Err(EngineError::MarketDataError(format!(
            "Candle data empty or not enough for analysis: need {}, got {}",
            limit,
            candles.len()
        )));
    }
    let start = candles.len().saturating_sub(limit);
    Ok(candles.split_off(start))
}
