// =============================================================================
// Service Configuration
// =============================================================================
//
// Central configuration for the Borealis backend: bind address, watchlist,
// upstream fetch parameters, indicator windows and the output rounding
// policy.  Loaded once at startup from `borealis_config.json`; a couple of
// deployment-specific knobs can additionally be overridden via environment
// variables.
//
// All fields carry `#[serde(default)]` so that adding new fields never
// breaks loading an older config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::AnalysisParams;
use crate::report::RoundingPolicy;

/// Environment variable overriding `bind_addr`.
pub const ENV_BIND_ADDR: &str = "BOREALIS_BIND_ADDR";
/// Environment variable overriding `watchlist` (comma-separated coin ids).
pub const ENV_WATCHLIST: &str = "BOREALIS_WATCHLIST";

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_watchlist() -> Vec<String> {
    vec![
        "bitcoin".to_string(),
        "ethereum".to_string(),
        "solana".to_string(),
        "dogecoin".to_string(),
        "kaspa".to_string(),
    ]
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

fn default_history_days() -> u32 {
    30
}

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_scan_pool_size() -> usize {
    20
}

fn default_scan_top_n() -> usize {
    3
}

// =============================================================================
// ServiceConfig
// =============================================================================

/// Top-level configuration for the Borealis backend.
///
/// Every field has a serde default so that older JSON files missing new
/// fields will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    // --- Serving -------------------------------------------------------------

    /// Address and port the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    // --- Upstream data -------------------------------------------------------

    /// CoinGecko coin ids served by `/analyze-multi`.
    #[serde(default = "default_watchlist")]
    pub watchlist: Vec<String>,

    /// Quote currency for every price request.
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,

    /// How many days of daily prices to fetch per analysis.
    #[serde(default = "default_history_days")]
    pub history_days: u32,

    /// How long a fetched price series stays fresh in the cache.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    // --- Market scan ---------------------------------------------------------

    /// How many top-volume coins the scan pulls from the markets endpoint.
    #[serde(default = "default_scan_pool_size")]
    pub scan_pool_size: usize,

    /// How many movers the scan reports.
    #[serde(default = "default_scan_top_n")]
    pub scan_top_n: usize,

    // --- Analysis ------------------------------------------------------------

    /// Indicator windows and periods.
    #[serde(default)]
    pub indicators: AnalysisParams,

    /// Decimal places per output field family.
    #[serde(default)]
    pub rounding: RoundingPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            watchlist: default_watchlist(),
            vs_currency: default_vs_currency(),
            history_days: default_history_days(),
            cache_ttl_secs: default_cache_ttl_secs(),
            scan_pool_size: default_scan_pool_size(),
            scan_top_n: default_scan_top_n(),
            indicators: AnalysisParams::default(),
            rounding: RoundingPolicy::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read service config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse service config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            watchlist = ?config.watchlist,
            "service config loaded"
        );

        Ok(config)
    }

    /// Apply environment-variable overrides for deployment-specific knobs.
    pub fn apply_env_overrides(&mut self) {
        self.override_from(
            std::env::var(ENV_BIND_ADDR).ok(),
            std::env::var(ENV_WATCHLIST).ok(),
        );
    }

    fn override_from(&mut self, bind_addr: Option<String>, watchlist: Option<String>) {
        if let Some(addr) = bind_addr {
            info!(bind_addr = %addr, "bind address overridden from environment");
            self.bind_addr = addr;
        }
        if let Some(raw) = watchlist {
            let coins: Vec<String> = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !coins.is_empty() {
                info!(watchlist = ?coins, "watchlist overridden from environment");
                self.watchlist = coins;
            }
        }
    }
}
