// =============================================================================
// Analysis Engine
// =============================================================================
//
// The computational core of the service: a pure function from an ordered
// price series plus indicator parameters to the full set of derived series
// and a snapshot of their latest values. No I/O, no shared state, no
// rounding — callers that render responses apply rounding at the boundary.
//
// A series with a malformed sample is rejected wholesale. Samples are never
// skipped or re-sorted: a repair here would mask an upstream data-quality
// defect.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::indicators::bollinger::calculate_bollinger;
use crate::indicators::ema::calculate_ema;
use crate::indicators::macd::calculate_macd;
use crate::indicators::rsi::calculate_rsi;
use crate::indicators::sma::calculate_sma;
use crate::types::PriceSeries;

/// Why an analysis request was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("insufficient data: need at least {required} samples, got {provided}")]
    InsufficientData { required: usize, provided: usize },

    #[error("malformed sample at index {index}: non-finite price {price}")]
    NonFinitePrice { index: usize, price: f64 },

    #[error("malformed sample at index {index}: negative price {price}")]
    NegativePrice { index: usize, price: f64 },

    #[error("malformed sample at index {index}: timestamp {current} precedes {previous}")]
    NonMonotonicTimestamp {
        index: usize,
        previous: i64,
        current: i64,
    },
}

/// Window and period parameters for the indicator set.
///
/// Deserialized as part of the service configuration; every field falls back
/// to the conventional default when absent from the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisParams {
    #[serde(default = "default_sma_window")]
    pub sma_window: usize,
    #[serde(default = "default_ema_window")]
    pub ema_window: usize,
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default = "default_macd_short")]
    pub macd_short: usize,
    #[serde(default = "default_macd_long")]
    pub macd_long: usize,
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,
    #[serde(default = "default_bollinger_mult")]
    pub bollinger_mult: f64,
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
}

fn default_sma_window() -> usize {
    7
}
fn default_ema_window() -> usize {
    7
}
fn default_rsi_period() -> usize {
    14
}
fn default_macd_short() -> usize {
    12
}
fn default_macd_long() -> usize {
    26
}
fn default_macd_signal() -> usize {
    9
}
fn default_bollinger_mult() -> f64 {
    2.0
}
fn default_min_samples() -> usize {
    10
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            sma_window: default_sma_window(),
            ema_window: default_ema_window(),
            rsi_period: default_rsi_period(),
            macd_short: default_macd_short(),
            macd_long: default_macd_long(),
            macd_signal: default_macd_signal(),
            bollinger_mult: default_bollinger_mult(),
            min_samples: default_min_samples(),
        }
    }
}

/// The value of every indicator at the final position of its series, plus
/// the series-wide price extrema.
///
/// Fields are `Option` exactly where the underlying series can be undefined
/// at the tail; a `None` here means "not enough history", never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
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

/// Full output of one engine invocation: every derived series, aligned
/// index-for-index with the input, plus the latest-value snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub timestamps_ms: Vec<i64>,
    pub prices: Vec<f64>,
    pub sma: Vec<Option<f64>>,
    pub ema: Vec<f64>,
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub snapshot: Snapshot,
}

/// Run the full indicator pipeline over one price series.
///
/// The series is validated first: it must carry at least
/// `params.min_samples` points (never fewer than one), every price must be
/// finite and non-negative, and timestamps must be non-decreasing. Any
/// violation rejects the whole series.
///
/// The computation itself cannot fail: a flat series yields collapsed
/// Bollinger bands and an all-`None` RSI rather than a numeric fault.
pub fn analyze(series: &PriceSeries, params: &AnalysisParams) -> Result<Analysis, AnalysisError> {
    validate(series, params.min_samples)?;

    let timestamps_ms: Vec<i64> = series.points().iter().map(|p| p.timestamp_ms).collect();
    let prices = series.prices();

    let sma = calculate_sma(&prices, params.sma_window);
    let ema = calculate_ema(&prices, params.ema_window);
    let rsi = calculate_rsi(&prices, params.rsi_period);
    let macd = calculate_macd(
        &prices,
        params.macd_short,
        params.macd_long,
        params.macd_signal,
    );
    let bands = calculate_bollinger(&prices, params.sma_window, params.bollinger_mult);

    let support = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let resistance = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let last = prices.len() - 1;
    let snapshot = Snapshot {
        timestamp_ms: timestamps_ms[last],
        price: prices[last],
        sma: sma[last],
        ema: ema[last],
        bb_upper: bands.upper[last],
        bb_lower: bands.lower[last],
        rsi: rsi[last],
        macd: macd.macd[last],
        signal: macd.signal[last],
        support,
        resistance,
    };

    Ok(Analysis {
        timestamps_ms,
        prices,
        sma,
        ema,
        rsi,
        macd: macd.macd,
        signal: macd.signal,
        bb_upper: bands.upper,
        bb_lower: bands.lower,
        snapshot,
    })
}

/// Reject series that are too short or carry malformed samples.
///
/// The effective minimum is never below one sample, whatever the configured
/// `min_samples` says: the pipeline reads the final position of every series
/// it accepts. Length is checked before sample shape, so a short series with
/// a bad sample reports `InsufficientData`. Equal consecutive timestamps are
/// accepted; only a strict decrease is non-monotonic. A price of exactly
/// zero is legal (some venues report delisted assets that way).
fn validate(series: &PriceSeries, min_samples: usize) -> Result<(), AnalysisError> {
    let required = min_samples.max(1);
    if series.len() < required {
        return Err(AnalysisError::InsufficientData {
            required,
            provided: series.len(),
        });
    }

    let mut prev_ts: Option<i64> = None;
    for (index, point) in series.points().iter().enumerate() {
        if !point.price.is_finite() {
            return Err(AnalysisError::NonFinitePrice {
                index,
                price: point.price,
            });
        }
        if point.price < 0.0 {
            return Err(AnalysisError::NegativePrice {
                index,
                price: point.price,
            });
        }
        if let Some(previous) = prev_ts {
            if point.timestamp_ms < previous {
                return Err(AnalysisError::NonMonotonicTimestamp {
                    index,
                    previous,
                    current: point.timestamp_ms,
                });
            }
        }
        prev_ts = Some(point.timestamp_ms);
    }

    Ok(())
}
