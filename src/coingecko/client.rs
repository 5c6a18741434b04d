// =============================================================================
// CoinGecko REST API Client
// =============================================================================
//
// Public market-data endpoints only, no signing. An optional demo API key is
// attached as the x-cg-demo-api-key header when configured; without one the
// client runs against the anonymous tier. Every call is a single attempt
// with a 10 s timeout — retry policy belongs to the caller, not here.
// =============================================================================

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::types::PriceSeries;

/// Wire format of GET /coins/{id}/market_chart.
///
/// Each price entry is `[timestamp_ms, price]`; CoinGecko emits the
/// timestamp as a JSON number, so both slots arrive as `f64`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChart {
    pub prices: Vec<[f64; 2]>,
}

/// One row of GET /coins/markets.
///
/// Only the columns the market scan consumes are kept; serde skips the rest
/// of the row. The 24 h change is nullable upstream (freshly listed or
/// stale coins), so it lands as `Option` rather than defaulting to zero.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub price_change_percentage_24h: Option<f64>,
}

/// CoinGecko REST API client.
#[derive(Clone)]
pub struct CoinGeckoClient {
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl CoinGeckoClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a new `CoinGeckoClient`.
    ///
    /// # Arguments
    /// * `api_key` — optional CoinGecko demo API key; sent as a header on
    ///   every request when present.
    pub fn new(api_key: Option<String>) -> Self {
        let mut default_headers = HeaderMap::new();
        if let Some(key) = api_key.as_deref() {
            if let Ok(val) = HeaderValue::from_str(key) {
                default_headers.insert("x-cg-demo-api-key", val);
            }
        }

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        debug!(
            has_api_key = api_key.is_some(),
            "CoinGeckoClient initialised (base_url=https://api.coingecko.com)"
        );

        Self {
            api_key,
            base_url: "https://api.coingecko.com".to_string(),
            client,
        }
    }

    // -------------------------------------------------------------------------
    // Market data
    // -------------------------------------------------------------------------

    /// GET /api/v3/coins/{id}/market_chart — daily close prices.
    ///
    /// Returns the chart's price track as a [`PriceSeries`] ordered as
    /// delivered by the API (ascending in time).
    #[instrument(skip(self), name = "coingecko::get_market_chart")]
    pub async fn get_market_chart(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<PriceSeries> {
        let url = format!(
            "{}/api/v3/coins/{}/market_chart?vs_currency={}&days={}&interval=daily",
            self.base_url, coin_id, vs_currency, days
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET market_chart for '{coin_id}' request failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!(
                "CoinGecko GET market_chart for '{coin_id}' returned {status}: {body}"
            );
        }

        let chart: MarketChart = resp
            .json()
            .await
            .context("failed to parse market_chart response")?;

        let series = chart_to_series(&chart);
        debug!(coin_id, vs_currency, days, samples = series.len(), "market chart fetched");
        Ok(series)
    }

    /// GET /api/v3/coins/markets — top coins by volume, with 24 h change.
    #[instrument(skip(self), name = "coingecko::get_top_markets")]
    pub async fn get_top_markets(
        &self,
        vs_currency: &str,
        per_page: usize,
    ) -> Result<Vec<CoinMarket>> {
        let url = format!(
            "{}/api/v3/coins/markets?vs_currency={}&order=volume_desc&per_page={}&page=1&price_change_percentage=24h",
            self.base_url, vs_currency, per_page
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("GET /api/v3/coins/markets request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("CoinGecko GET /api/v3/coins/markets returned {status}: {body}");
        }

        let markets: Vec<CoinMarket> = resp
            .json()
            .await
            .context("failed to parse coins/markets response")?;

        debug!(vs_currency, count = markets.len(), "top markets fetched");
        Ok(markets)
    }
}

/// Convert the wire chart into the engine's input series.
fn chart_to_series(chart: &MarketChart) -> PriceSeries {
    PriceSeries::from_pairs(chart.prices.iter().map(|p| (p[0] as i64, p[1])))
}

impl std::fmt::Debug for CoinGeckoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinGeckoClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}
