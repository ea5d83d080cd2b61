use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One trading day of price history as delivered by the data source.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PriceRecord {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price of the day
    pub high: f64,
    /// Lowest price of the day
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Closing price adjusted for splits and dividends
    pub adj_close: f64,
    /// Traded volume
    pub volume: u64,
}

/// Tail of a ticker's price history.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PriceHistoryResponse {
    /// Ticker symbol
    pub ticker: String,
    /// First date of the downloaded range
    pub start_date: Option<NaiveDate>,
    /// Last date of the downloaded range
    pub end_date: Option<NaiveDate>,
    /// Number of trading days downloaded
    pub total_records: usize,
    /// The most recent records, oldest first
    pub records: Vec<PriceRecord>,
}

impl PriceHistoryResponse {
    pub fn new(ticker: String, all: &[PriceRecord], tail: usize) -> Self {
        let skip = all.len().saturating_sub(tail);
        Self {
            ticker,
            start_date: all.first().map(|r| r.date),
            end_date: all.last().map(|r| r.date),
            total_records: all.len(),
            records: all[skip..].to_vec(),
        }
    }
}
