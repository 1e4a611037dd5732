use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One OHLCV bar. Series are ordered oldest-first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Builds a candle from an epoch-millisecond timestamp.
    /// Returns `None` when the timestamp is out of chrono's range.
    pub fn from_millis(
        timestamp_ms: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Option<Self> {
        let timestamp = DateTime::from_timestamp_millis(timestamp_ms)?;
        Some(Candle { timestamp, open, high, low, close, volume })
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeFrame {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "30m")]
    Minute30,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    Day1,
}

impl TimeFrame {
    pub const ALL: [TimeFrame; 7] = [
        TimeFrame::Minute1,
        TimeFrame::Minute5,
        TimeFrame::Minute15,
        TimeFrame::Minute30,
        TimeFrame::Hour1,
        TimeFrame::Hour4,
        TimeFrame::Day1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::Minute1 => "1m",
            TimeFrame::Minute5 => "5m",
            TimeFrame::Minute15 => "15m",
            TimeFrame::Minute30 => "30m",
            TimeFrame::Hour1 => "1h",
            TimeFrame::Hour4 => "4h",
            TimeFrame::Day1 => "1d",
        }
    }

    /// Granularity code used by the Bitget mix-market candles endpoint.
    pub fn exchange_granularity(&self) -> &'static str {
        match self {
            TimeFrame::Minute1 => "1m",
            TimeFrame::Minute5 => "5m",
            TimeFrame::Minute15 => "15m",
            TimeFrame::Minute30 => "30m",
            TimeFrame::Hour1 => "1H",
            TimeFrame::Hour4 => "4H",
            TimeFrame::Day1 => "1D",
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedTimeFrame(pub String);

impl fmt::Display for UnsupportedTimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported timeframe '{}'", self.0)
    }
}

impl std::error::Error for UnsupportedTimeFrame {}

impl FromStr for TimeFrame {
    type Err = UnsupportedTimeFrame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeFrame::ALL
            .iter()
            .copied()
            .find(|tf| tf.as_str() == s.trim())
            .ok_or_else(|| UnsupportedTimeFrame(s.to_string()))
    }
}

/// A named indicator series aligned index-for-index with its candles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub name: String,
    pub parameters: serde_json::Value,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdValues {
    pub line: Option<f64>,
    pub signal: Option<f64>,
    pub histogram: Option<f64>,
}

/// Latest-value snapshot of every indicator the engine computes.
/// `None` means the series was too short for that indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub sma: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: MacdValues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
    None,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
            Signal::None => "NONE",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OpenPosition {
    Buy,
    Sell,
    Hold,
}

impl OpenPosition {
    /// BUY and SELL carry over; anything else means stay flat.
    pub fn from_signal(signal: Signal) -> Self {
        match signal {
            Signal::Buy => OpenPosition::Buy,
            Signal::Sell => OpenPosition::Sell,
            Signal::Hold | Signal::None => OpenPosition::Hold,
        }
    }
}

impl fmt::Display for OpenPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OpenPosition::Buy => "BUY",
            OpenPosition::Sell => "SELL",
            OpenPosition::Hold => "HOLD",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopLossTakeProfit {
    pub stop_loss: f64,
    pub take_profit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceTrend {
    Uptrend,
    Downtrend,
    Sideways,
}

impl fmt::Display for PriceTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriceTrend::Uptrend => "Uptrend",
            PriceTrend::Downtrend => "Downtrend",
            PriceTrend::Sideways => "Sideways",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeTrend {
    Up,
    Down,
    Stable,
}

impl fmt::Display for VolumeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VolumeTrend::Up => "Up",
            VolumeTrend::Down => "Down",
            VolumeTrend::Stable => "Stable",
        };
        f.write_str(s)
    }
}

/// Everything a renderer needs for one analysed series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub signal: Signal,
    pub open_position: OpenPosition,
    pub stop_loss_take_profit: Option<StopLossTakeProfit>,
    pub support: f64,
    pub resistance: f64,
    pub price: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_timestamp: DateTime<Utc>,
    pub indicators: IndicatorSet,
    pub price_action: PriceTrend,
    pub volume_trend: VolumeTrend,
    pub strategy: String,
    pub narrative: Vec<String>,
}
