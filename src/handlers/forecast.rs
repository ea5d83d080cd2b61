use crate::helpers::controls::{DEFAULT_YEARS, horizon_days};
use crate::helpers::data::{load_data, run_forecast};
use crate::helpers::errors::AppError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse, ForecastQuery};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::ForecastResponse;
use tracing::{debug, info, instrument, trace};

/// Forecast a ticker's closing price
///
/// Fits the model to the full downloaded history and returns the last rows
/// of the forecast table.
#[utoipa::path(
    get,
    path = "/api/v1/tickers/{ticker}/forecast",
    tag = "forecast",
    params(
        ("ticker" = String, Path, description = "Ticker symbol, e.g. GOOG"),
        ForecastQuery,
    ),
    responses(
        (status = 200, description = "Forecast computed successfully", body = ApiResponse<ForecastResponse>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 404, description = "No data for the ticker", body = ErrorResponse),
        (status = 422, description = "Too little history to fit the model", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
        (status = 502, description = "Market data source failed", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_forecast(
    Path(ticker): Path<String>,
    Valid(Query(query)): Valid<Query<ForecastQuery>>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<ForecastResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_forecast function for ticker: {}", ticker);

    let years = query.years.unwrap_or(DEFAULT_YEARS);
    let horizon = horizon_days(years);
    let tail = query.tail.unwrap_or(state.settings.table_tail);
    debug!("Forecasting {} for {} days, returning {} rows", ticker, horizon, tail);

    let history = load_data(&state, &ticker)
        .await
        .map_err(|e| AppError::from(e).into_response_parts())?;
    let history_ticker = history.ticker().to_string();

    let table = run_forecast(history, horizon)
        .await
        .map_err(AppError::into_response_parts)?;

    info!(
        "Forecast for {} has {} rows ending {:?}",
        history_ticker,
        table.len(),
        table.last_date()
    );

    let response = ForecastResponse {
        ticker: history_ticker,
        years,
        horizon_days: horizon,
        history_len: table.history_len(),
        total_rows: table.len(),
        rows: table.tail(tail).to_vec(),
    };

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(response, "Forecast computed successfully")),
    ))
}
