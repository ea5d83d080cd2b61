use axum::{http::StatusCode, response::Json};
use compute::error::ComputeError;
use market::MarketError;
use tracing::{error, warn};

use crate::schemas::ErrorResponse;

/// Failure of the load-then-forecast flow.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Market(#[from] MarketError),

    #[error(transparent)]
    Compute(#[from] ComputeError),

    /// The blocking forecast task panicked or was cancelled
    #[error("Forecast task failed: {0}")]
    Task(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Market(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Market(_) => StatusCode::BAD_GATEWAY,
            AppError::Compute(e) if e.is_insufficient_data() => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Compute(_) | AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Market(e) if e.is_not_found() => "TICKER_NOT_FOUND",
            AppError::Market(_) => "UPSTREAM_ERROR",
            AppError::Compute(e) if e.is_insufficient_data() => "INSUFFICIENT_DATA",
            AppError::Compute(_) => "FORECAST_ERROR",
            AppError::Task(_) => "INTERNAL_ERROR",
        }
    }

    /// Logs the failure and converts it to the JSON error body.
    pub fn into_response_parts(self) -> (StatusCode, Json<ErrorResponse>) {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed with {}: {}", status, self);
        } else {
            warn!("Request rejected with {}: {}", status, self);
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
                code: self.code().to_string(),
                success: false,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_errors_map_to_404() {
        let err = AppError::from(MarketError::NoData("ZZZZ".to_string()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = AppError::from(MarketError::Api {
            code: "Not Found".to_string(),
            description: "No data found, symbol may be delisted".to_string(),
        });
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "TICKER_NOT_FOUND");
    }

    #[test]
    fn other_upstream_errors_map_to_502() {
        let err = AppError::from(MarketError::RequestFailed("timeout".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        let err = AppError::from(MarketError::Parse("bad json".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn compute_errors_map_by_kind() {
        let err = AppError::from(ComputeError::InsufficientData("1 row".to_string()));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let err = AppError::from(ComputeError::Fit("Singular".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn response_body_is_unsuccessful() {
        let (status, Json(body)) =
            AppError::from(MarketError::NoData("ZZZZ".to_string())).into_response_parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!body.success);
        assert_eq!(body.code, "TICKER_NOT_FOUND");
        assert!(body.error.contains("ZZZZ"));
    }
}
