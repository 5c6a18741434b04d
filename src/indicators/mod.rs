// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators derived by the
// analysis engine. Every function maps a slice of closing prices to a series
// of the same length, aligned index-for-index with the input. Positions with
// insufficient lookback carry an explicit `None` so callers are forced to
// distinguish "no value yet" from a numeric zero.
//
// EMA and MACD are the exception: they are seeded from the first sample and
// therefore defined at every index, so they return plain `Vec<f64>`.
//
// No rounding happens here. Values are carried at full precision through the
// recurrences and rounded once at the response boundary.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
