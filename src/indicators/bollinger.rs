// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands place a volatility envelope around the simple moving
// average: an upper band at SMA + k*σ and a lower band at SMA - k*σ, where σ
// is the rolling sample standard deviation over the same window. The middle
// band is the SMA itself and is reported as its own series.

use super::sma::{calculate_sma, rolling_std};

/// Upper and lower Bollinger bands, aligned with the input series.
#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// Both bands are full-length series aligned index-for-index with `closes`.
/// A position carries a value exactly when the underlying SMA does, i.e.
/// from index `window - 1` onward; earlier positions are `None`.
///
/// σ is the *sample* standard deviation (divisor `window - 1`), so on a
/// perfectly flat stretch both bands collapse onto the moving average
/// rather than disappearing.
///
/// # Edge cases
/// - Empty input returns two empty vectors.
/// - `window == 0`, `window == 1` or `window > closes.len()` yields
///   all-`None` bands (no position has both an SMA and a deviation).
pub fn calculate_bollinger(closes: &[f64], window: usize, num_std: f64) -> BollingerSeries {
    let sma = calculate_sma(closes, window);
    let std = rolling_std(closes, window);

    let mut upper = Vec::with_capacity(closes.len());
    let mut lower = Vec::with_capacity(closes.len());

    for (mid, dev) in sma.iter().zip(std.iter()) {
        match (mid, dev) {
            (Some(m), Some(s)) => {
                upper.push(Some(m + num_std * s));
                lower.push(Some(m - num_std * s));
            }
            _ => {
                upper.push(None);
                lower.push(None);
            }
        }
    }

    BollingerSeries { upper, lower }
}
