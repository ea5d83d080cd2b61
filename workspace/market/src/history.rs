use chrono::NaiveDate;
use common::PriceRecord;
use polars::prelude::*;

use crate::error::Result;

/// Column names of the price frame, matching what the data source calls them.
pub const DATE_COLUMN: &str = "Date";
pub const OPEN_COLUMN: &str = "Open";
pub const HIGH_COLUMN: &str = "High";
pub const LOW_COLUMN: &str = "Low";
pub const CLOSE_COLUMN: &str = "Close";
pub const ADJ_CLOSE_COLUMN: &str = "Adj Close";
pub const VOLUME_COLUMN: &str = "Volume";

/// Daily price history of a single ticker, ordered by date with one record per day.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    ticker: String,
    records: Vec<PriceRecord>,
}

impl PriceHistory {
    /// Builds a history from records in any order.
    ///
    /// Records are sorted by date; when a date occurs more than once the last
    /// record delivered for it wins.
    pub fn new(ticker: impl Into<String>, mut records: Vec<PriceRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        let mut deduped: Vec<PriceRecord> = Vec::with_capacity(records.len());
        for record in records {
            match deduped.last_mut() {
                Some(last) if last.date == record.date => *last = record,
                _ => deduped.push(record),
            }
        }

        Self {
            ticker: ticker.into(),
            records: deduped,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The last `n` records, oldest first.
    pub fn tail(&self, n: usize) -> &[PriceRecord] {
        let skip = self.records.len().saturating_sub(n);
        &self.records[skip..]
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Converts the history into a DataFrame with one column per price field.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let dates: Vec<NaiveDate> = self.records.iter().map(|r| r.date).collect();
        let opens: Vec<f64> = self.records.iter().map(|r| r.open).collect();
        let highs: Vec<f64> = self.records.iter().map(|r| r.high).collect();
        let lows: Vec<f64> = self.records.iter().map(|r| r.low).collect();
        let closes: Vec<f64> = self.records.iter().map(|r| r.close).collect();
        let adj_closes: Vec<f64> = self.records.iter().map(|r| r.adj_close).collect();
        let volumes: Vec<u64> = self.records.iter().map(|r| r.volume).collect();

        let df = DataFrame::new(vec![
            Series::new(DATE_COLUMN.into(), dates).into(),
            Series::new(OPEN_COLUMN.into(), opens).into(),
            Series::new(HIGH_COLUMN.into(), highs).into(),
            Series::new(LOW_COLUMN.into(), lows).into(),
            Series::new(CLOSE_COLUMN.into(), closes).into(),
            Series::new(ADJ_CLOSE_COLUMN.into(), adj_closes).into(),
            Series::new(VOLUME_COLUMN.into(), volumes).into(),
        ])?;

        Ok(df)
    }
}
