// =============================================================================
// CoinGecko Integration
// =============================================================================
//
// Thin upstream layer: one REST client plus the wire types it deserialises.
// Everything downstream of here works on `PriceSeries` and never sees the
// raw JSON shapes.

pub mod client;

pub use client::{CoinGeckoClient, CoinMarket};
