// =============================================================================
// Moving Average Convergence-Divergence (MACD)
// =============================================================================
//
// MACD line   = EMA(close, short) - EMA(close, long)
// Signal line = EMA(MACD line, signal span)
//
// Both EMAs are seeded at index 0 (see `ema.rs`), so the MACD and signal
// series are numeric at EVERY position, with `MACD[0] == 0` by construction
// (both operands start from the same seed). There is deliberately no
// undefined marker here: the values exist from the first sample, they merely
// need history to become statistically meaningful, and callers must not
// conflate "numerically present" with "stable".
//
// Default spans: short = 12, long = 26, signal = 9.
// =============================================================================

use crate::indicators::ema::calculate_ema;

/// MACD line and its signal line, index-aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

/// Compute the MACD and signal series for `closes`.
///
/// Both output vectors have exactly `closes.len()` entries (empty input
/// yields empty vectors).
pub fn calculate_macd(
    closes: &[f64],
    short_span: usize,
    long_span: usize,
    signal_span: usize,
) -> MacdSeries {
    let ema_short = calculate_ema(closes, short_span);
    let ema_long = calculate_ema(closes, long_span);

    let macd: Vec<f64> = ema_short
        .iter()
        .zip(ema_long.iter())
        .map(|(s, l)| s - l)
        .collect();

    // The signal line is the EMA of the MACD series itself, seeded at MACD[0].
    let signal = calculate_ema(&macd, signal_span);

    MacdSeries { macd, signal }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_empty_input() {
        let out = calculate_macd(&[], 12, 26, 9);
        assert!(out.macd.is_empty());
        assert!(out.signal.is_empty());
    }

    #[test]
    fn macd_full_length_and_zero_seed() {
        let closes: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        let out = calculate_macd(&closes, 12, 26, 9);
        assert_eq!(out.macd.len(), closes.len());
        assert_eq!(out.signal.len(), closes.len());
        // Identically seeded EMAs cancel at index 0.
        assert_eq!(out.macd[0], 0.0);
        assert_eq!(out.signal[0], 0.0);
    }

    #[test]
    fn macd_defined_even_for_short_series() {
        // Far fewer samples than the long span — still numeric everywhere.
        let closes = [10.0, 11.0, 12.0];
        let out = calculate_macd(&closes, 12, 26, 9);
        assert_eq!(out.macd.len(), 3);
        assert!(out.macd.iter().all(|v| v.is_finite()));
        assert!(out.signal.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn macd_positive_in_uptrend() {
        // The short EMA hugs a rising price closer than the long EMA, so the
        // MACD line turns and stays positive once the trend is established.
        let closes: Vec<f64> = (1..=60).map(|x| x as f64 * 2.0).collect();
        let out = calculate_macd(&closes, 12, 26, 9);
        assert!(out.macd[30..].iter().all(|v| *v > 0.0));
    }

    #[test]
    fn macd_negative_in_downtrend() {
        let closes: Vec<f64> = (1..=60).rev().map(|x| x as f64 * 2.0).collect();
        let out = calculate_macd(&closes, 12, 26, 9);
        assert!(out.macd[30..].iter().all(|v| *v < 0.0));
    }

    #[test]
    fn macd_constant_series_is_all_zero() {
        let closes = [50.0; 30];
        let out = calculate_macd(&closes, 12, 26, 9);
        for (m, s) in out.macd.iter().zip(out.signal.iter()) {
            assert_eq!(*m, 0.0);
            assert_eq!(*s, 0.0);
        }
    }

    #[test]
    fn macd_signal_smooths_macd() {
        // The signal line is a smoothed MACD: its total variation is no
        // larger than the MACD line's.
        let closes: Vec<f64> = (0..80)
            .map(|x| 100.0 + ((x as f64) * 0.7).sin() * 5.0)
            .collect();
        let out = calculate_macd(&closes, 12, 26, 9);
        let var = |xs: &[f64]| -> f64 { xs.windows(2).map(|w| (w[1] - w[0]).abs()).sum() };
        assert!(var(&out.signal) <= var(&out.macd));
    }
}
