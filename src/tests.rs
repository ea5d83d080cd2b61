#[cfg(test)]
mod integration_tests {
    use crate::schemas::{ApiResponse, CacheClearResponse, ErrorResponse, HealthResponse};
    use crate::test_utils::test_utils::{
        CountingSource, UNKNOWN_TICKER, init_test_tracing, setup_state_with_source,
        setup_test_app, setup_test_app_with_state, synthetic_history,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use common::{ForecastResponse, PriceHistoryResponse, TickerOptions};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_check() {
        let _guard = init_test_tracing();
        let server = TestServer::new(setup_test_app()).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: HealthResponse = response.json();
        assert_eq!(body.status, "healthy");
    }

    #[tokio::test]
    async fn test_get_tickers() {
        let server = TestServer::new(setup_test_app()).unwrap();

        let response = server.get("/api/v1/tickers").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<TickerOptions> = response.json();
        assert!(body.success);
        assert_eq!(body.data.tickers.len(), 30);
        assert_eq!(body.data.default_ticker, "GOOG");
    }

    #[tokio::test]
    async fn test_get_prices_returns_tail() {
        let server = TestServer::new(setup_test_app()).unwrap();

        let response = server
            .get("/api/v1/tickers/msft/prices")
            .add_query_param("tail", 7)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<PriceHistoryResponse> = response.json();
        assert!(body.success);
        assert_eq!(body.data.ticker, "MSFT");
        assert_eq!(body.data.total_records, 120);
        assert_eq!(body.data.records.len(), 7);
        assert_eq!(body.data.records.last().map(|r| r.date), body.data.end_date);
    }

    #[tokio::test]
    async fn test_get_prices_default_tail_is_five() {
        let server = TestServer::new(setup_test_app()).unwrap();

        let response = server.get("/api/v1/tickers/GOOG/prices").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<PriceHistoryResponse> = response.json();
        assert_eq!(body.data.records.len(), 5);
    }

    #[tokio::test]
    async fn test_unknown_ticker_is_not_found() {
        let server = TestServer::new(setup_test_app()).unwrap();

        let response = server
            .get(&format!("/api/v1/tickers/{}/prices", UNKNOWN_TICKER))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: ErrorResponse = response.json();
        assert!(!body.success);
        assert_eq!(body.code, "TICKER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_forecast() {
        let server = TestServer::new(setup_test_app()).unwrap();

        let response = server
            .get("/api/v1/tickers/GOOG/forecast")
            .add_query_param("years", 2)
            .add_query_param("tail", 10)
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ForecastResponse> = response.json();
        assert!(body.success);
        let forecast = body.data;
        assert_eq!(forecast.years, 2);
        assert_eq!(forecast.horizon_days, 730);
        assert_eq!(forecast.history_len, 120);
        assert_eq!(forecast.total_rows, 120 + 730);
        assert_eq!(forecast.rows.len(), 10);
        for row in &forecast.rows {
            assert!(row.yhat_lower <= row.yhat_upper);
            assert!((row.yhat - (row.trend + row.additive_terms)).abs() < 1e-6);
        }
    }

    #[tokio::test]
    async fn test_forecast_rejects_years_out_of_range() {
        let server = TestServer::new(setup_test_app()).unwrap();

        for years in [0, 5] {
            let response = server
                .get("/api/v1/tickers/GOOG/forecast")
                .add_query_param("years", years)
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_forecast_with_single_record_is_unprocessable() {
        let source = Arc::new(CountingSource::new(synthetic_history("GOOG", 1)));
        let server =
            TestServer::new(setup_test_app_with_state(setup_state_with_source(source))).unwrap();

        let response = server.get("/api/v1/tickers/GOOG/forecast").await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "INSUFFICIENT_DATA");
    }

    #[tokio::test]
    async fn test_clear_cache_forces_new_download() {
        let source = Arc::new(CountingSource::new(synthetic_history("GOOG", 40)));
        let state = setup_state_with_source(source.clone());
        let server = TestServer::new(setup_test_app_with_state(state)).unwrap();

        server.get("/api/v1/tickers/GOOG/prices").await.assert_status_ok();
        server.get("/api/v1/tickers/GOOG/prices").await.assert_status_ok();
        assert_eq!(source.calls(), 1);

        let response = server.post("/api/v1/cache/clear").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<CacheClearResponse> = response.json();
        assert!(body.success);

        server.get("/api/v1/tickers/GOOG/prices").await.assert_status_ok();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_dashboard_renders_sections() {
        let server = TestServer::new(setup_test_app()).unwrap();

        let response = server
            .get("/")
            .add_query_param("ticker", "MSFT")
            .add_query_param("years", 3)
            .await;

        response.assert_status(StatusCode::OK);
        let html = response.text();
        assert!(html.contains("StockSage: A webapp for predicting stock prices"));
        assert!(html.contains("<h2>MSFT</h2>"));
        assert!(html.contains("Raw data"));
        assert!(html.contains("Forecast plot for 3 years"));
        assert!(html.contains("raw-data-plot"));
        assert!(html.contains("forecast-plot"));
        assert!(html.contains("component-trend"));
        assert!(html.contains("component-weekly"));
    }

    #[tokio::test]
    async fn test_dashboard_custom_ticker_and_clamped_years() {
        let server = TestServer::new(setup_test_app()).unwrap();

        let response = server
            .get("/")
            .add_query_param("ticker", "MSFT")
            .add_query_param("custom_ticker", "nflx")
            .add_query_param("years", 9)
            .await;

        response.assert_status(StatusCode::OK);
        let html = response.text();
        assert!(html.contains("<h2>NFLX</h2>"));
        assert!(html.contains("Forecast plot for 4 years"));
    }

    #[tokio::test]
    async fn test_dashboard_clamps_malformed_years() {
        let server = TestServer::new(setup_test_app()).unwrap();

        let response = server
            .get("/")
            .add_query_param("years", "99999999999999999999")
            .await;
        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("Forecast plot for 4 years"));

        let response = server.get("/").add_query_param("years", "abc").await;
        response.assert_status(StatusCode::OK);
        assert!(response.text().contains("Forecast plot for 1 years"));
    }

    #[tokio::test]
    async fn test_dashboard_shows_errors_inline() {
        let server = TestServer::new(setup_test_app()).unwrap();

        let response = server
            .get("/")
            .add_query_param("custom_ticker", UNKNOWN_TICKER)
            .await;

        response.assert_status(StatusCode::OK);
        let html = response.text();
        assert!(html.contains("class=\"alert\""));
        assert!(html.contains("Not Found"));
        assert!(html.contains("<select id=\"ticker\""));
    }

    #[tokio::test]
    async fn test_loading_status_shown_once_per_session() {
        let server = TestServer::new(setup_test_app()).unwrap();

        let first = server.get("/").await.text();
        assert!(first.contains("Loading data... done!"));

        let second = server.get("/").await.text();
        assert!(!second.contains("Loading data... done!"));

        let response = server.post("/cache/clear").await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/");

        let third = server.get("/").await.text();
        assert!(third.contains("Loading data... done!"));
    }
}
