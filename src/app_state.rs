// =============================================================================
// Central Application State — Borealis Backend
// =============================================================================
//
// The single source of truth shared by every request handler. AppState ties
// the upstream client, the series cache and the service configuration
// together behind one `Arc`.
//
// Thread safety:
//   - Atomic counter for lock-free request accounting.
//   - parking_lot::RwLock around the configuration.
//   - Arc wrappers for components that manage their own interior mutability.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::Serialize;

use crate::cache::SeriesCache;
use crate::coingecko::CoinGeckoClient;
use crate::service_config::ServiceConfig;

/// Central application state shared across all handlers via `Arc<AppState>`.
pub struct AppState {
    // ── Configuration ───────────────────────────────────────────────────
    pub config: RwLock<ServiceConfig>,

    // ── Upstream data ───────────────────────────────────────────────────
    pub market: Arc<CoinGeckoClient>,

    // ── Caching ─────────────────────────────────────────────────────────
    pub series_cache: Arc<SeriesCache>,

    // ── Accounting ──────────────────────────────────────────────────────
    /// Total analyses served since startup (cache hits included).
    pub analyses_served: AtomicU64,

    // ── Timing ──────────────────────────────────────────────────────────
    /// Instant when the service was started. Used for uptime calculations.
    pub start_time: Instant,
}

impl AppState {
    /// Construct a new `AppState` from the given configuration and upstream
    /// client. The returned value is typically wrapped in `Arc` immediately.
    pub fn new(config: ServiceConfig, market: CoinGeckoClient) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        Self {
            config: RwLock::new(config),
            market: Arc::new(market),
            series_cache: Arc::new(SeriesCache::new(ttl)),
            analyses_served: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Count one served analysis and return the running total.
    pub fn record_analysis(&self) -> u64 {
        self.analyses_served.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Build the `/health` payload.
    pub fn build_health(&self) -> HealthSnapshot {
        let config = self.config.read();
        HealthSnapshot {
            status: "ok".to_string(),
            uptime_secs: self.start_time.elapsed().as_secs(),
            analyses_served: self.analyses_served.load(Ordering::Relaxed),
            cached_series: self.series_cache.len(),
            watchlist_size: config.watchlist.len(),
            server_time: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Liveness payload for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub status: String,
    pub uptime_secs: u64,
    pub analyses_served: u64,
    pub cached_series: usize,
    pub watchlist_size: usize,
    pub server_time: i64,
}
