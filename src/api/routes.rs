// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// Public market-analysis endpoints, mirroring the upstream identifiers
// CoinGecko uses (`symbol` query values are coin ids like "bitcoin").
//
// Error contract: validation problems with the fetched series come back as
// 422 with `{"error": ...}`; upstream fetch failures come back as 502 with
// the same body shape. CORS is configured permissively for development.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::app_state::AppState;
use crate::cache::SeriesKey;
use crate::coingecko::CoinMarket;
use crate::engine::analyze;
use crate::report::{
    format_datetime, history_block, latest_block, round_to, HistoryBlock, LatestBlock,
};
use crate::summary::build_summary;
use crate::types::PriceSeries;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST router with CORS + request tracing and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/analyze", get(analyze_one))
        .route("/analyze-multi", get(analyze_multi))
        .route("/market-scan", get(market_scan))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Shorthand for the `{"error": ...}` rejection body.
fn reject(status: StatusCode, message: String) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(serde_json::json!({ "error": message })))
}

// =============================================================================
// Root & health
// =============================================================================

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Borealis crypto backend online!" }))
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.build_health())
}

// =============================================================================
// Series fetch (cache-through)
// =============================================================================

/// Fetch the price series for `coin_id`, going to the upstream API only on a
/// cache miss.
async fn fetch_series(state: &AppState, coin_id: &str) -> anyhow::Result<PriceSeries> {
    let (vs_currency, days) = {
        let config = state.config.read();
        (config.vs_currency.clone(), config.history_days)
    };

    let key = SeriesKey {
        coin_id: coin_id.to_string(),
        vs_currency: vs_currency.clone(),
        days,
    };

    if let Some(series) = state.series_cache.get(&key) {
        debug!(%key, "series cache hit");
        return Ok(series);
    }

    let series = state
        .market
        .get_market_chart(coin_id, &vs_currency, days)
        .await?;
    state.series_cache.insert(key, series.clone());
    Ok(series)
}

// =============================================================================
// Single-symbol analysis
// =============================================================================

#[derive(Deserialize)]
struct AnalyzeQuery {
    #[serde(default = "default_symbol")]
    symbol: String,
}

fn default_symbol() -> String {
    "bitcoin".to_string()
}

/// Full analysis payload for one coin.
#[derive(Debug, Clone, Serialize)]
struct AnalyzeResponse {
    symbol: String,
    date: String,
    latest: LatestBlock,
    summary: String,
    history: HistoryBlock,
}

async fn analyze_one(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, Json<serde_json::Value>)> {
    let symbol = query.symbol;

    let series = fetch_series(&state, &symbol)
        .await
        .map_err(|e| reject(StatusCode::BAD_GATEWAY, format!("upstream fetch failed: {e:#}")))?;

    let (params, rounding) = {
        let config = state.config.read();
        (config.indicators.clone(), config.rounding.clone())
    };

    let analysis = analyze(&series, &params)
        .map_err(|e| reject(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let latest = latest_block(&analysis, &rounding);
    let summary = build_summary(&symbol, &latest);
    let history = history_block(&analysis, &rounding);

    let served = state.record_analysis();
    debug!(symbol = %symbol, served, "analysis served");

    Ok(Json(AnalyzeResponse {
        symbol,
        date: format_datetime(chrono::Utc::now().timestamp_millis()),
        latest,
        summary,
        history,
    }))
}

// =============================================================================
// Watchlist analysis
// =============================================================================

/// Compact per-coin entry for the watchlist endpoint: latest values and
/// commentary, no charting history.
#[derive(Debug, Clone, Serialize)]
struct MultiAnalysis {
    symbol: String,
    latest: LatestBlock,
    summary: String,
}

#[derive(Debug, Clone, Serialize)]
struct MultiResponse {
    analysis: Vec<MultiAnalysis>,
}

async fn analyze_multi(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MultiResponse>, (StatusCode, Json<serde_json::Value>)> {
    let (watchlist, params, rounding) = {
        let config = state.config.read();
        (
            config.watchlist.clone(),
            config.indicators.clone(),
            config.rounding.clone(),
        )
    };

    let fetches = watchlist.iter().map(|symbol| fetch_series(&state, symbol));
    let results = futures_util::future::join_all(fetches).await;

    let mut analyses = Vec::with_capacity(watchlist.len());
    for (symbol, fetched) in watchlist.iter().zip(results) {
        let series = match fetched {
            Ok(series) => series,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "skipping symbol: fetch failed");
                continue;
            }
        };
        match analyze(&series, &params) {
            Ok(analysis) => {
                let latest = latest_block(&analysis, &rounding);
                let summary = build_summary(symbol, &latest);
                state.record_analysis();
                analyses.push(MultiAnalysis {
                    symbol: symbol.clone(),
                    latest,
                    summary,
                });
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "skipping symbol: series rejected");
            }
        }
    }

    if analyses.is_empty() {
        return Err(reject(
            StatusCode::BAD_GATEWAY,
            "no watchlist symbol could be analysed".to_string(),
        ));
    }

    Ok(Json(MultiResponse { analysis: analyses }))
}

// =============================================================================
// Market scan
// =============================================================================

/// One row of the volatility leaderboard.
#[derive(Debug, Clone, Serialize)]
struct ScanEntry {
    id: String,
    symbol: String,
    name: String,
    /// Absolute 24 h percentage move, rounded to two decimals.
    volatility_score: f64,
}

#[derive(Debug, Clone, Serialize)]
struct ScanResponse {
    top_volatile: Vec<ScanEntry>,
}

async fn market_scan(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ScanResponse>, (StatusCode, Json<serde_json::Value>)> {
    let (vs_currency, pool_size, top_n) = {
        let config = state.config.read();
        (
            config.vs_currency.clone(),
            config.scan_pool_size,
            config.scan_top_n,
        )
    };

    let markets = state
        .market
        .get_top_markets(&vs_currency, pool_size)
        .await
        .map_err(|e| reject(StatusCode::BAD_GATEWAY, format!("upstream fetch failed: {e:#}")))?;

    let top_volatile = rank_by_volatility(&markets, top_n);
    Ok(Json(ScanResponse { top_volatile }))
}

/// Rank coins by the magnitude of their 24 h move, largest first.
///
/// Coins without a reported 24 h change (fresh listings, stale data) are
/// left out rather than ranked as zero movers.
fn rank_by_volatility(markets: &[CoinMarket], top_n: usize) -> Vec<ScanEntry> {
    let mut entries: Vec<ScanEntry> = markets
        .iter()
        .filter_map(|m| {
            let change = m.price_change_percentage_24h?;
            Some(ScanEntry {
                id: m.id.clone(),
                symbol: m.symbol.clone(),
                name: m.name.clone(),
                volatility_score: round_to(change.abs(), 2),
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        b.volatility_score
            .partial_cmp(&a.volatility_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(top_n);
    entries
}
