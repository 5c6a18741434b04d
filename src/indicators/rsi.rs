// =============================================================================
// Relative Strength Index (RSI) — simple rolling mean variant
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price deltas from consecutive closes (none at index 0).
// Step 2 — Split each delta into gain = max(delta, 0) and
//          loss = max(-delta, 0).
// Step 3 — Take the SIMPLE rolling mean of gains and losses over the
//          trailing `period` deltas (a sliding-sum window, not Wilder's
//          exponential smoothing).
// Step 4 — RS  = mean_gain / mean_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Degenerate windows are resolved deterministically rather than crashing on
// a zero divisor:
//   mean_loss == 0, mean_gain > 0  => RSI saturates at 100
//   mean_loss == 0, mean_gain == 0 => undefined (`None`) — a flat window has
//                                     no momentum reading, and reporting 0 or
//                                     50 would fabricate one.
// =============================================================================

/// Compute the full RSI series for `closes` with the given `period`.
///
/// The result has exactly `closes.len()` entries. A position is numeric only
/// once `period` deltas are available, i.e. from index `period` onward;
/// everything earlier is `None`.
///
/// # Edge cases
/// - `period == 0` => all-`None` series.
/// - `closes.len() <= period` => all-`None` series (not enough deltas).
/// - Flat window (zero mean gain AND zero mean loss) => `None` at that
///   position, see header.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return result;
    }

    // Trailing sums of gains and losses over the last `period` deltas.
    // Delta k (k >= 1) is closes[k] - closes[k-1]; the window ending at
    // position i covers deltas i-period+1 ..= i. Each sum is paired with a
    // count of its nonzero entries: eviction can leave float residue behind
    // after large moves, and a window holding no gains (or no losses) must
    // read as exactly zero so the degenerate branches stay reachable.
    let mut gain_sum = 0.0_f64;
    let mut loss_sum = 0.0_f64;
    let mut gains_in_window = 0_usize;
    let mut losses_in_window = 0_usize;

    for i in 1..closes.len() {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            gain_sum += delta;
            gains_in_window += 1;
        } else if delta < 0.0 {
            loss_sum -= delta;
            losses_in_window += 1;
        }

        // Evict the delta that slid out of the window, snapping the sum
        // back to exactly zero when its side of the window empties.
        if i > period {
            let outgoing = closes[i - period] - closes[i - period - 1];
            if outgoing > 0.0 {
                gains_in_window -= 1;
                gain_sum = if gains_in_window == 0 {
                    0.0
                } else {
                    (gain_sum - outgoing).max(0.0)
                };
            } else if outgoing < 0.0 {
                losses_in_window -= 1;
                loss_sum = if losses_in_window == 0 {
                    0.0
                } else {
                    (loss_sum + outgoing).max(0.0)
                };
            }
        }

        if i >= period {
            let period_f = period as f64;
            result[i] = rsi_from_means(gain_sum / period_f, loss_sum / period_f);
        }
    }

    result
}

/// Convert a window's mean gain / mean loss into an RSI value in [0, 100],
/// or `None` for a flat window.
fn rsi_from_means(mean_gain: f64, mean_loss: f64) -> Option<f64> {
    if mean_loss == 0.0 {
        if mean_gain > 0.0 {
            Some(100.0) // Only gains in the window — saturated.
        } else {
            None // No movement at all — no reading.
        }
    } else {
        let rs = mean_gain / mean_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        let rsi = calculate_rsi(&[1.0, 2.0, 3.0], 0);
        assert_eq!(rsi, vec![None, None, None]);
    }

    #[test]
    fn rsi_insufficient_deltas() {
        // 10 closes => 9 deltas < period 14: full-length but all undefined.
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let rsi = calculate_rsi(&closes, 14);
        assert_eq!(rsi.len(), 10);
        assert!(rsi.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_defined_exactly_from_period() {
        let closes: Vec<f64> = (1..=30).map(|x| (x as f64).sin() + 10.0).collect();
        let rsi = calculate_rsi(&closes, 14);
        assert!(rsi[..14].iter().all(Option::is_none));
        assert!(rsi[14..].iter().all(Option::is_some));
    }

    #[test]
    fn rsi_all_gains_saturates_at_100() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let rsi = calculate_rsi(&closes, 14);
        for value in rsi.iter().flatten() {
            assert!((value - 100.0).abs() < 1e-10, "expected 100.0, got {value}");
        }
    }

    #[test]
    fn rsi_all_losses_pins_at_0() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let rsi = calculate_rsi(&closes, 14);
        assert!(rsi[14..].iter().all(Option::is_some));
        for value in rsi.iter().flatten() {
            assert!(value.abs() < 1e-10, "expected 0.0, got {value}");
        }
    }

    #[test]
    fn rsi_flat_market_is_undefined() {
        // Zero mean gain AND zero mean loss must surface as None — never 0,
        // never a fabricated 50.
        let closes = vec![100.0; 30];
        let rsi = calculate_rsi(&closes, 14);
        assert_eq!(rsi.len(), 30);
        assert!(rsi.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_flat_tail_after_violent_moves_is_undefined() {
        // A spike, a crash, then a long flat stretch. Once every nonzero
        // delta has slid out of the window the reading must return to None,
        // even though the sums saw values six orders of magnitude apart and
        // eviction arithmetic is not exact at that spread.
        let mut closes = vec![7.77, 28.749, 11_499.6, 11.4996, 0.011_499_6];
        closes.extend(std::iter::repeat(0.011_499_6).take(25));
        let rsi = calculate_rsi(&closes, 14);
        assert_eq!(rsi.len(), 30);
        // Windows still holding the spike or crash report a value.
        assert!(rsi[14..18].iter().all(Option::is_some));
        // Fully flat windows do not.
        assert!(rsi[18..].iter().all(Option::is_none), "{:?}", &rsi[18..]);
    }

    #[test]
    fn rsi_recovers_after_flat_stretch() {
        // 20 flat closes, then a rise: the flat windows are None, later
        // windows that contain movement are numeric again.
        let mut closes = vec![100.0; 20];
        closes.extend((1..=10).map(|x| 100.0 + x as f64));
        let rsi = calculate_rsi(&closes, 14);
        assert!(rsi[14..20].iter().all(Option::is_none));
        assert!(rsi[20..].iter().all(Option::is_some));
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let rsi = calculate_rsi(&closes, 14);
        for value in rsi.iter().flatten() {
            assert!((0.0..=100.0).contains(value), "RSI {value} out of range");
        }
    }

    #[test]
    fn rsi_simple_mean_hand_check() {
        // period = 2 over [1, 2, 4, 3]:
        //   deltas: +1, +2, -1
        //   i=2: gains (1+2)/2 = 1.5, losses 0      => 100
        //   i=3: gains (2+0)/2 = 1.0, losses 0.5    => RS=2, RSI=100-100/3
        let rsi = calculate_rsi(&[1.0, 2.0, 4.0, 3.0], 2);
        assert!(rsi[0].is_none());
        assert!(rsi[1].is_none());
        assert_eq!(rsi[2], Some(100.0));
        let expected = 100.0 - 100.0 / 3.0;
        assert!((rsi[3].unwrap() - expected).abs() < 1e-12);
    }
}
