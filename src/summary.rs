// =============================================================================
// Deterministic Summary
// =============================================================================
//
// One-paragraph plain-text read of the latest snapshot: momentum zone from
// RSI, price position relative to the moving average, and MACD bias. Built
// purely from the rounded presentation values, so the same input series
// always yields byte-identical text.
//
// Thresholds: RSI >= 70 => overbought, RSI <= 30 => oversold.

use crate::report::LatestBlock;

fn momentum_clause(rsi: Option<f64>) -> String {
    match rsi {
        Some(r) if r >= 70.0 => format!("overbought (RSI {r})"),
        Some(r) if r <= 30.0 => format!("oversold (RSI {r})"),
        Some(r) => format!("showing neutral momentum (RSI {r})"),
        None => "with momentum not yet readable".to_string(),
    }
}

fn average_clause(price: f64, sma: Option<f64>) -> &'static str {
    match sma {
        Some(avg) if price > avg => "above its moving average",
        Some(avg) if price < avg => "below its moving average",
        Some(_) => "on its moving average",
        None => "with its moving average still forming",
    }
}

fn macd_clause(macd: f64, signal: f64) -> &'static str {
    if macd > signal {
        "a bullish MACD bias"
    } else if macd < signal {
        "a bearish MACD bias"
    } else {
        "a flat MACD"
    }
}

/// Render the snapshot as a short deterministic commentary.
pub fn build_summary(symbol: &str, latest: &LatestBlock) -> String {
    format!(
        "{symbol} trades at {price}, {average}, {momentum}, with {macd}. \
         Support sits at {support}, resistance at {resistance}.",
        symbol = symbol,
        price = latest.price,
        average = average_clause(latest.price, latest.sma),
        momentum = momentum_clause(latest.rsi),
        macd = macd_clause(latest.macd, latest.signal),
        support = latest.support,
        resistance = latest.resistance,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latest(rsi: Option<f64>, sma: Option<f64>, macd: f64, signal: f64) -> LatestBlock {
        LatestBlock {
            timestamp_ms: 1_700_000_000_000,
            price: 100.0,
            sma,
            ema: 99.5,
            bb_upper: sma.map(|s| s + 4.0),
            bb_lower: sma.map(|s| s - 4.0),
            rsi,
            macd,
            signal,
            support: 90.0,
            resistance: 110.0,
        }
    }

    #[test]
    fn summary_flags_overbought() {
        let text = build_summary("bitcoin", &latest(Some(82.5), Some(95.0), 1.0, 0.5));
        assert!(text.contains("overbought (RSI 82.5)"));
        assert!(text.contains("above its moving average"));
        assert!(text.contains("bullish MACD bias"));
    }

    #[test]
    fn summary_flags_oversold() {
        let text = build_summary("ethereum", &latest(Some(21.0), Some(104.0), -1.0, -0.5));
        assert!(text.contains("oversold (RSI 21)"));
        assert!(text.contains("below its moving average"));
        assert!(text.contains("bearish MACD bias"));
    }

    #[test]
    fn summary_handles_undefined_indicators() {
        let text = build_summary("kaspa", &latest(None, None, 0.0, 0.0));
        assert!(text.contains("momentum not yet readable"));
        assert!(text.contains("moving average still forming"));
        assert!(text.contains("a flat MACD"));
        // Undefined never leaks as a numeric zero.
        assert!(!text.contains("RSI 0"));
    }

    #[test]
    fn summary_names_the_levels() {
        let text = build_summary("solana", &latest(Some(50.0), Some(100.0), 0.2, 0.1));
        assert!(text.starts_with("solana trades at 100"));
        assert!(text.contains("Support sits at 90, resistance at 110."));
    }

    #[test]
    fn summary_is_deterministic() {
        let block = latest(Some(64.2), Some(98.0), 0.3, 0.4);
        assert_eq!(
            build_summary("dogecoin", &block),
            build_summary("dogecoin", &block)
        );
    }
}
