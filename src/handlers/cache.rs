use crate::helpers::data::clear_cache;
use crate::schemas::{ApiResponse, AppState, CacheClearResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Json, Redirect},
};
use tracing::{instrument, trace};

/// Clear the download cache
#[utoipa::path(
    post,
    path = "/api/v1/cache/clear",
    tag = "cache",
    responses(
        (status = 200, description = "Cache cleared", body = ApiResponse<CacheClearResponse>)
    )
)]
#[instrument]
pub async fn clear_cache_api(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<CacheClearResponse>>) {
    trace!("Entering clear_cache_api function");
    let cleared_entries = clear_cache(&state).await;
    (
        StatusCode::OK,
        Json(ApiResponse::ok(
            CacheClearResponse { cleared_entries },
            "Cache cleared",
        )),
    )
}

/// Dashboard "Clear cache" button; clears, then goes back to the dashboard.
#[instrument]
pub async fn clear_cache_form(State(state): State<AppState>) -> Redirect {
    trace!("Entering clear_cache_form function");
    clear_cache(&state).await;
    Redirect::to("/")
}
