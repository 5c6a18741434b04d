// =============================================================================
// Borealis Market Insight — Main Entry Point
// =============================================================================
//
// Fetches historical prices from CoinGecko, runs the indicator pipeline over
// them and serves the results over a small REST API. Stateless apart from a
// short-lived series cache; safe to restart at any time.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod cache;
mod coingecko;
mod engine;
mod indicators;
mod report;
mod service_config;
mod summary;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::coingecko::CoinGeckoClient;
use crate::service_config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Borealis Market Insight — Starting Up            ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let mut config = ServiceConfig::load("borealis_config.json").unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        ServiceConfig::default()
    });
    config.apply_env_overrides();

    info!(
        watchlist = ?config.watchlist,
        vs_currency = %config.vs_currency,
        history_days = config.history_days,
        "Analysis configuration ready"
    );

    // ── 2. Upstream client ───────────────────────────────────────────────
    let api_key = std::env::var("COINGECKO_API_KEY")
        .ok()
        .filter(|k| !k.is_empty());
    if api_key.is_none() {
        info!("No COINGECKO_API_KEY set — running against the anonymous tier");
    }
    let market = CoinGeckoClient::new(api_key);

    // ── 3. Shared state ──────────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let prune_every_secs = config.cache_ttl_secs.max(1);
    let state = Arc::new(AppState::new(config, market));

    // ── 4. Cache maintenance ─────────────────────────────────────────────
    let prune_cache = state.series_cache.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(tokio::time::Duration::from_secs(prune_every_secs));
        loop {
            interval.tick().await;
            prune_cache.prune_expired();
        }
    });

    // ── 5. API server ────────────────────────────────────────────────────
    let app = api::routes::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("Borealis Market Insight shut down complete.");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    warn!("Shutdown signal received — stopping gracefully");
}
