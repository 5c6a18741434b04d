// =============================================================================
// Simple Moving Average (SMA) + trailing standard deviation
// =============================================================================
//
// SMA is the arithmetic mean of the trailing `window` prices at each position.
// The rolling standard deviation shares the same window and the same lookback
// gap, and is the volatility input for the Bollinger bands.
//
// Both series are full-length and index-aligned with the input: positions
// with fewer than `window` samples behind them are `None`, never `0.0` — the
// charting consumers treat "no value" as a first-class state.
//
// Implementation: a sliding sum (and sum-of-squares) accumulator, O(n) total
// instead of re-summing every window.
// =============================================================================

/// Compute the full SMA series for `closes` with the given `window`.
///
/// The result has exactly `closes.len()` entries. Positions `< window - 1`
/// are `None`; every later position holds the mean of the trailing `window`
/// closes.
///
/// # Edge cases
/// - `window == 0` => all-`None` series.
/// - `window > closes.len()` => all-`None` series.
pub fn calculate_sma(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if window == 0 || closes.len() < window {
        return result;
    }

    let window_f = window as f64;
    let mut sum: f64 = closes[..window].iter().sum();
    result[window - 1] = Some(sum / window_f);

    for i in window..closes.len() {
        sum += closes[i] - closes[i - window];
        result[i] = Some(sum / window_f);
    }

    result
}

/// Compute the trailing **sample** standard deviation (divide by `window - 1`)
/// over the same window as [`calculate_sma`], aligned the same way.
///
/// Uses the sliding sum / sum-of-squares form; the variance is clamped at
/// zero before the square root so a constant window never turns a rounding
/// residue into a NaN.
///
/// # Edge cases
/// - `window < 2` => all-`None` series (sample deviation needs at least two
///   points per window).
/// - `window > closes.len()` => all-`None` series.
pub fn rolling_std(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if window < 2 || closes.len() < window {
        return result;
    }

    let window_f = window as f64;
    let mut sum: f64 = closes[..window].iter().sum();
    let mut sum_sq: f64 = closes[..window].iter().map(|x| x * x).sum();
    result[window - 1] = Some(std_from_sums(sum, sum_sq, window_f));

    for i in window..closes.len() {
        let incoming = closes[i];
        let outgoing = closes[i - window];
        sum += incoming - outgoing;
        sum_sq += incoming * incoming - outgoing * outgoing;
        result[i] = Some(std_from_sums(sum, sum_sq, window_f));
    }

    result
}

/// Sample standard deviation from a window's sum and sum-of-squares.
fn std_from_sums(sum: f64, sum_sq: f64, n: f64) -> f64 {
    let variance = (sum_sq - sum * sum / n) / (n - 1.0);
    variance.max(0.0).sqrt()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_empty_input() {
        assert!(calculate_sma(&[], 7).is_empty());
    }

    #[test]
    fn sma_window_zero() {
        let sma = calculate_sma(&[1.0, 2.0, 3.0], 0);
        assert_eq!(sma, vec![None, None, None]);
    }

    #[test]
    fn sma_window_larger_than_input() {
        let sma = calculate_sma(&[1.0, 2.0, 3.0], 7);
        assert_eq!(sma.len(), 3);
        assert!(sma.iter().all(Option::is_none));
    }

    #[test]
    fn sma_leading_gap_and_values() {
        // window = 3 over [1..=5]: defined from index 2.
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        let sma = calculate_sma(&closes, 3);
        assert_eq!(sma.len(), 5);
        assert!(sma[0].is_none());
        assert!(sma[1].is_none());
        assert_eq!(sma[2], Some(2.0));
        assert_eq!(sma[3], Some(3.0));
        assert_eq!(sma[4], Some(4.0));
    }

    #[test]
    fn sma_window_one_is_identity() {
        let closes = [5.0, 7.0, 9.0];
        let sma = calculate_sma(&closes, 1);
        assert_eq!(sma, vec![Some(5.0), Some(7.0), Some(9.0)]);
    }

    #[test]
    fn sma_constant_series() {
        let closes = [50.0; 20];
        let sma = calculate_sma(&closes, 7);
        for value in &sma[6..] {
            assert_eq!(*value, Some(50.0));
        }
    }

    #[test]
    fn rolling_std_known_window() {
        // Sample std of [2, 4, 4, 4, 5, 5, 7, 9] is 2.138089935...
        let closes = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let std = rolling_std(&closes, 8);
        assert_eq!(std.len(), 8);
        assert!(std[..7].iter().all(Option::is_none));
        let last = std[7].unwrap();
        assert!((last - 2.1380899352993).abs() < 1e-10, "got {last}");
    }

    #[test]
    fn rolling_std_constant_window_is_zero() {
        let closes = [50.0; 10];
        let std = rolling_std(&closes, 7);
        for value in &std[6..] {
            assert_eq!(*value, Some(0.0));
        }
    }

    #[test]
    fn rolling_std_window_below_two() {
        let std = rolling_std(&[1.0, 2.0, 3.0], 1);
        assert!(std.iter().all(Option::is_none));
    }

    #[test]
    fn rolling_std_alignment_matches_sma() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let sma = calculate_sma(&closes, 7);
        let std = rolling_std(&closes, 7);
        for (s, d) in sma.iter().zip(std.iter()) {
            assert_eq!(s.is_some(), d.is_some());
        }
    }
}
