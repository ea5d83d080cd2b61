//! Common transport-layer types shared between the data, compute and server crates.
//! These structs are the request/response payloads of the JSON API and the rows
//! rendered by the dashboard tables, so every layer agrees on one shape.

mod forecast;
mod prices;

pub use forecast::{ForecastPoint, ForecastResponse};
pub use prices::{PriceHistoryResponse, PriceRecord};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    /// Wrap successful response data together with a message.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// Ticker candidates offered by the dashboard dropdown.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TickerOptions {
    /// Ticker symbols in display order
    pub tickers: Vec<String>,
    /// Ticker used when nothing is selected
    pub default_ticker: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_response_ok_sets_success() {
        let response = ApiResponse::ok(vec![1, 2, 3], "Loaded");
        assert!(response.success);
        assert_eq!(response.message, "Loaded");
        assert_eq!(response.data.len(), 3);
    }

    #[test]
    fn api_response_roundtrips_through_json() {
        let response = ApiResponse::ok(
            TickerOptions {
                tickers: vec!["GOOG".to_string(), "AAPL".to_string()],
                default_ticker: "GOOG".to_string(),
            },
            "Tickers",
        );
        let json = serde_json::to_string(&response).unwrap();
        let back: ApiResponse<TickerOptions> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data, response.data);
    }
}
