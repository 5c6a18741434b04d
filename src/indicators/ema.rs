// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha = 2 / (span + 1)
//   EMA_0 = close_0
//   EMA_t = close_t * alpha + EMA_{t-1} * (1 - alpha)
//
// Seeding with the very first close means the series is defined from index 0
// onward — unlike the SMA there is NO lookback gap. Downstream consumers rely
// on that asymmetry: an SMA hole is `None`, an early EMA is a real (if not
// yet statistically settled) number.
// =============================================================================

/// Compute the full EMA series for `closes` with the given `span`.
///
/// The result has exactly `closes.len()` entries and is numeric at every
/// position; `result[0] == closes[0]`.
///
/// # Edge cases
/// - Empty input => empty vec.
/// - `span == 0` is treated as `span == 1`, for which `alpha == 1` and the
///   series degenerates to a copy of the input.
pub fn calculate_ema(closes: &[f64], span: usize) -> Vec<f64> {
    if closes.is_empty() {
        return Vec::new();
    }

    let span = span.max(1);
    let alpha = 2.0 / (span as f64 + 1.0);

    let mut result = Vec::with_capacity(closes.len());
    let mut ema = closes[0];
    result.push(ema);

    for &close in &closes[1..] {
        ema = close * alpha + ema * (1.0 - alpha);
        result.push(ema);
    }

    result
}
