// =============================================================================
// Report Building
// =============================================================================
//
// Turns a raw `Analysis` into the serializable blocks the HTTP layer sends
// out. This is the single place where rounding happens: the engine carries
// full-precision values through every recurrence, and the per-field decimal
// policy is applied here, once, on the way out.
//
// Undefined positions stay `None` end to end and serialize as JSON `null`.
// They are never coerced to `0` — a zero-filled leading window corrupts any
// chart or statistic computed downstream.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::engine::Analysis;

/// Decimal places applied per field family at the response boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundingPolicy {
    /// Raw prices.
    #[serde(default = "default_price_decimals")]
    pub price: u32,
    /// SMA and EMA.
    #[serde(default = "default_average_decimals")]
    pub average: u32,
    /// Bollinger upper/lower.
    #[serde(default = "default_band_decimals")]
    pub band: u32,
    /// MACD and its signal line.
    #[serde(default = "default_macd_decimals")]
    pub macd: u32,
    /// RSI.
    #[serde(default = "default_rsi_decimals")]
    pub rsi: u32,
    /// Support and resistance levels.
    #[serde(default = "default_level_decimals")]
    pub level: u32,
}

fn default_price_decimals() -> u32 {
    4
}
fn default_average_decimals() -> u32 {
    4
}
fn default_band_decimals() -> u32 {
    4
}
fn default_macd_decimals() -> u32 {
    4
}
fn default_rsi_decimals() -> u32 {
    2
}
fn default_level_decimals() -> u32 {
    2
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self {
            price: default_price_decimals(),
            average: default_average_decimals(),
            band: default_band_decimals(),
            macd: default_macd_decimals(),
            rsi: default_rsi_decimals(),
            level: default_level_decimals(),
        }
    }
}

/// Latest value of every indicator, rounded for presentation.
///
/// The timestamp serializes under the plain `timestamp` key; the field name
/// keeps the unit explicit for callers inside the crate.
#[derive(Debug, Clone, Serialize)]
pub struct LatestBlock {
    #[serde(rename = "timestamp")]
    pub timestamp_ms: i64,
    pub price: f64,
    pub sma: Option<f64>,
    pub ema: f64,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: f64,
    pub signal: f64,
    pub support: f64,
    pub resistance: f64,
}

/// Parallel per-sample series for charting, rounded for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryBlock {
    pub dates: Vec<String>,
    pub prices: Vec<f64>,
    pub sma: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn round_opt(value: Option<f64>, decimals: u32) -> Option<f64> {
    value.map(|v| round_to(v, decimals))
}

/// Millisecond timestamp as a `YYYY-MM-DD` UTC date.
pub fn format_date(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

/// Millisecond timestamp as a `YYYY-MM-DD HH:MM:SS` UTC datetime.
pub fn format_datetime(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

/// Extract the rounded latest-value block from an analysis.
pub fn latest_block(analysis: &Analysis, rounding: &RoundingPolicy) -> LatestBlock {
    let snap = &analysis.snapshot;
    LatestBlock {
        timestamp_ms: snap.timestamp_ms,
        price: round_to(snap.price, rounding.price),
        sma: round_opt(snap.sma, rounding.average),
        ema: round_to(snap.ema, rounding.average),
        bb_upper: round_opt(snap.bb_upper, rounding.band),
        bb_lower: round_opt(snap.bb_lower, rounding.band),
        rsi: round_opt(snap.rsi, rounding.rsi),
        macd: round_to(snap.macd, rounding.macd),
        signal: round_to(snap.signal, rounding.macd),
        support: round_to(snap.support, rounding.level),
        resistance: round_to(snap.resistance, rounding.level),
    }
}

/// Extract the rounded charting history from an analysis.
pub fn history_block(analysis: &Analysis, rounding: &RoundingPolicy) -> HistoryBlock {
    HistoryBlock {
        dates: analysis
            .timestamps_ms
            .iter()
            .map(|ts| format_date(*ts))
            .collect(),
        prices: analysis
            .prices
            .iter()
            .map(|p| round_to(*p, rounding.price))
            .collect(),
        sma: analysis
            .sma
            .iter()
            .map(|v| round_opt(*v, rounding.average))
            .collect(),
        bb_upper: analysis
            .bb_upper
            .iter()
            .map(|v| round_opt(*v, rounding.band))
            .collect(),
        bb_lower: analysis
            .bb_lower
            .iter()
            .map(|v| round_opt(*v, rounding.band))
            .collect(),
    }
}
