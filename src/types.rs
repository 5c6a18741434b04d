// =============================================================================
// Shared types used across the Borealis analysis service
// =============================================================================

use serde::{Deserialize, Serialize};

/// A single timestamped price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// UNIX timestamp in milliseconds.
    pub timestamp_ms: i64,
    /// Observed price in the quote currency.
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp_ms: i64, price: f64) -> Self {
        Self {
            timestamp_ms,
            price,
        }
    }
}

/// An ordered price series, oldest sample first.
///
/// Construction performs no validation; `engine::analyze` validates the
/// whole series up front and rejects malformed input with a precise error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from `(timestamp_ms, price)` pairs as delivered by the
    /// upstream market-data API.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (i64, f64)>) -> Self {
        Self {
            points: pairs
                .into_iter()
                .map(|(timestamp_ms, price)| PricePoint::new(timestamp_ms, price))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// The most recent sample, if any.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Copy the raw prices out as a dense slice for the indicator functions.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }
}
