use crate::helpers::controls::ticker_options;
use crate::helpers::data::load_data;
use crate::helpers::errors::AppError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse, PriceQuery};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::{PriceHistoryResponse, TickerOptions};
use tracing::{debug, info, instrument, trace};

/// Get the tickers offered by the dashboard
#[utoipa::path(
    get,
    path = "/api/v1/tickers",
    tag = "tickers",
    responses(
        (status = 200, description = "Ticker options retrieved successfully", body = ApiResponse<TickerOptions>)
    )
)]
#[instrument]
pub async fn get_tickers() -> (StatusCode, Json<ApiResponse<TickerOptions>>) {
    trace!("Entering get_tickers function");
    (
        StatusCode::OK,
        Json(ApiResponse::ok(
            ticker_options(),
            "Ticker options retrieved successfully",
        )),
    )
}

/// Get the most recent daily prices of a ticker
#[utoipa::path(
    get,
    path = "/api/v1/tickers/{ticker}/prices",
    tag = "tickers",
    params(
        ("ticker" = String, Path, description = "Ticker symbol, e.g. GOOG"),
        PriceQuery,
    ),
    responses(
        (status = 200, description = "Price history retrieved successfully", body = ApiResponse<PriceHistoryResponse>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 404, description = "No data for the ticker", body = ErrorResponse),
        (status = 502, description = "Market data source failed", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_prices(
    Path(ticker): Path<String>,
    Valid(Query(query)): Valid<Query<PriceQuery>>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<PriceHistoryResponse>>), (StatusCode, Json<ErrorResponse>)>
{
    trace!("Entering get_prices function for ticker: {}", ticker);
    let tail = query.tail.unwrap_or(state.settings.table_tail);
    debug!("Fetching last {} price records of {}", tail, ticker);

    let history = load_data(&state, &ticker)
        .await
        .map_err(|e| AppError::from(e).into_response_parts())?;

    let response = PriceHistoryResponse::new(history.ticker().to_string(), history.records(), tail);
    info!(
        "Returning {} of {} price records for {}",
        response.records.len(),
        response.total_records,
        response.ticker
    );

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(response, "Price history retrieved successfully")),
    ))
}
