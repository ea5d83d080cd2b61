use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of a forecast table.
///
/// `yhat = trend + additive_terms` and `additive_terms = weekly + yearly`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ForecastPoint {
    /// Date of the prediction
    pub ds: NaiveDate,
    /// Trend component
    pub trend: f64,
    /// Lower bound of the trend uncertainty interval
    pub trend_lower: f64,
    /// Upper bound of the trend uncertainty interval
    pub trend_upper: f64,
    /// Weekly seasonal component
    pub weekly: f64,
    /// Yearly seasonal component
    pub yearly: f64,
    /// Sum of all seasonal components
    pub additive_terms: f64,
    /// Lower bound of the prediction interval
    pub yhat_lower: f64,
    /// Upper bound of the prediction interval
    pub yhat_upper: f64,
    /// Predicted value
    pub yhat: f64,
}

/// Tail of a forecast for a ticker.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ForecastResponse {
    /// Ticker symbol
    pub ticker: String,
    /// Requested horizon in years
    pub years: u32,
    /// Requested horizon in days
    pub horizon_days: u32,
    /// Number of historical rows the model was fit on
    pub history_len: usize,
    /// Number of rows in the full forecast table
    pub total_rows: usize,
    /// The last rows of the forecast table
    pub rows: Vec<ForecastPoint>,
}
