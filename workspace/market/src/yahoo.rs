//! Yahoo Finance chart API client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use common::PriceRecord;
use serde::Deserialize;
use tracing::{debug, instrument, trace, warn};

use crate::error::{MarketError, Result};
use crate::history::PriceHistory;
use crate::PriceSource;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

/// Exchange metadata; timestamps are shifted by `gmtoffset` to get the session date.
#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    adjclose: Vec<Option<f64>>,
}

/// Daily price history from the Yahoo Finance chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooFinance {
    base_url: String,
    client: reqwest::Client,
}

impl YahooFinance {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Client against the public endpoint with a 20 second timeout.
    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(20))
    }

    /// Builds the request URL; the symbol is percent-encoded as a single path segment.
    fn build_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| MarketError::InvalidRequest(format!("Bad base URL '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| MarketError::InvalidRequest(format!("Base URL '{}' cannot have a path", self.base_url)))?
            .push(symbol);
        url.query_pairs_mut()
            .append_pair("period1", &unix_midnight(start).to_string())
            .append_pair("period2", &unix_midnight(end).to_string())
            .append_pair("interval", "1d")
            .append_pair("events", "history");
        Ok(url)
    }

    /// Parses a chart API response body into price records.
    ///
    /// Rows where any of open/high/low/close/volume is null are skipped.
    fn parse_response(symbol: &str, json: &str) -> Result<Vec<PriceRecord>> {
        let response: YahooResponse =
            serde_json::from_str(json).map_err(|e| MarketError::Parse(e.to_string()))?;

        if let Some(error) = response.chart.error {
            return Err(MarketError::Api {
                code: error.code,
                description: error.description,
            });
        }

        let results = response
            .chart
            .result
            .ok_or_else(|| MarketError::NoData(symbol.to_string()))?;
        let data = results
            .first()
            .ok_or_else(|| MarketError::NoData(symbol.to_string()))?;
        let quote = data
            .indicators
            .quote
            .first()
            .ok_or_else(|| MarketError::NoData(symbol.to_string()))?;
        let adj_close = data.indicators.adjclose.as_ref().and_then(|a| a.first());

        let mut records = Vec::with_capacity(data.timestamp.len());
        for (i, ts) in data.timestamp.iter().enumerate() {
            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();
            let adj = adj_close.and_then(|a| a.adjclose.get(i).copied().flatten());

            let (Some(open), Some(high), Some(low), Some(close), Some(volume)) =
                (open, high, low, close, volume)
            else {
                trace!("Skipping incomplete row {} for {}", i, symbol);
                continue;
            };

            let local = ts.saturating_add(data.meta.gmtoffset);
            let Some(date) = DateTime::from_timestamp(local, 0).map(|dt| dt.date_naive()) else {
                warn!("Skipping row {} for {} with invalid timestamp {}", i, symbol, ts);
                continue;
            };

            records.push(PriceRecord {
                date,
                open,
                high,
                low,
                close,
                adj_close: adj.unwrap_or(close),
                volume,
            });
        }

        if records.is_empty() {
            return Err(MarketError::NoData(symbol.to_string()));
        }

        Ok(records)
    }
}

#[async_trait]
impl PriceSource for YahooFinance {
    #[instrument(skip(self))]
    async fn fetch_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceHistory> {
        if start >= end {
            return Err(MarketError::InvalidRequest(format!(
                "Start date {} must be before end date {}",
                start, end
            )));
        }

        let url = self.build_url(ticker, start, end)?;
        debug!("Requesting price history: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        trace!("Received {} bytes with status {}", body.len(), status);

        // Yahoo reports unknown symbols as a 404 with an error object in the body.
        let records = Self::parse_response(ticker, &body).map_err(|e| match e {
            MarketError::Parse(_) if !status.is_success() => {
                MarketError::RequestFailed(format!("HTTP status {}", status))
            }
            other => other,
        })?;

        debug!("Downloaded {} records for {}", records.len(), ticker);
        Ok(PriceHistory::new(ticker, records))
    }
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}
