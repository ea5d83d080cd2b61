use crate::handlers::{
    cache::{clear_cache_api, clear_cache_form},
    dashboard::dashboard,
    forecast::get_forecast,
    health::health_check,
    tickers::{get_prices, get_tickers},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Dashboard
        .route("/", get(dashboard))
        .route("/cache/clear", post(clear_cache_form))
        // Health check
        .route("/health", get(health_check))
        // API v1 routes
        .route("/api/v1/tickers", get(get_tickers))
        .route("/api/v1/tickers/:ticker/prices", get(get_prices))
        .route("/api/v1/tickers/:ticker/forecast", get(get_forecast))
        .route("/api/v1/cache/clear", post(clear_cache_api))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
