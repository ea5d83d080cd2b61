use common::{ForecastPoint, ForecastResponse, PriceHistoryResponse, PriceRecord, TickerOptions};
use market::{PriceHistory, PriceSource};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};
use validator::Validate;

use crate::config::Settings;

pub use common::ApiResponse;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Where price history is downloaded from
    pub source: Arc<dyn PriceSource>,
    /// Downloaded price history keyed by cache generation and uppercase ticker
    pub cache: Cache<(u64, String), PriceHistory>,
    /// Bumped on every clear so downloads started earlier are never served again
    pub generation: Arc<AtomicU64>,
    /// Set once data has been loaded; cleared together with the cache
    pub loaded_once: Arc<AtomicBool>,
    /// Application settings
    pub settings: Arc<Settings>,
}

/// Query parameters of the dashboard page
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Ticker picked from the dropdown
    pub ticker: Option<String>,
    /// Free-text ticker; overrides the dropdown when not empty
    pub custom_ticker: Option<String>,
    /// Forecast horizon in years as typed; read leniently, then clamped to 1..=4
    pub years: Option<String>,
}

/// Query parameters of the price history endpoint
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct PriceQuery {
    /// Number of most recent records to return (default: 5)
    #[validate(range(min = 1, max = 100000))]
    pub tail: Option<usize>,
}

/// Query parameters of the forecast endpoint
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct ForecastQuery {
    /// Forecast horizon in years (default: 1)
    #[validate(range(min = 1, max = 4))]
    pub years: Option<u32>,
    /// Number of last forecast rows to return (default: 5)
    #[validate(range(min = 1, max = 100000))]
    pub tail: Option<usize>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Number of tickers currently cached
    pub cached_tickers: u64,
}

/// Result of a cache clear
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CacheClearResponse {
    /// Entries that were cached before clearing
    pub cleared_entries: u64,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::tickers::get_tickers,
        crate::handlers::tickers::get_prices,
        crate::handlers::forecast::get_forecast,
        crate::handlers::cache::clear_cache_api,
    ),
    components(
        schemas(
            ApiResponse<TickerOptions>,
            ApiResponse<PriceHistoryResponse>,
            ApiResponse<ForecastResponse>,
            ApiResponse<CacheClearResponse>,
            ErrorResponse,
            HealthResponse,
            CacheClearResponse,
            PriceQuery,
            ForecastQuery,
            TickerOptions,
            PriceRecord,
            PriceHistoryResponse,
            ForecastPoint,
            ForecastResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "tickers", description = "Ticker list and price history endpoints"),
        (name = "forecast", description = "Price forecast endpoints"),
        (name = "cache", description = "Download cache endpoints"),
    ),
    info(
        title = "StockSage API",
        description = "StockSage - stock price history and forecasts with trend and seasonality decomposition",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
