use chrono::NaiveDate;
use common::ForecastPoint;
use polars::prelude::*;

use crate::error::Result;

/// Column names of the forecast frame.
pub const FORECAST_COLUMNS: [&str; 10] = [
    "ds",
    "trend",
    "trend_lower",
    "trend_upper",
    "weekly",
    "yearly",
    "additive_terms",
    "yhat_lower",
    "yhat_upper",
    "yhat",
];

/// Output of a fitted model: one row per historical date followed by one row
/// per future date, in ascending date order.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastTable {
    rows: Vec<ForecastPoint>,
    history_len: usize,
    weekly: bool,
    yearly: bool,
}

impl ForecastTable {
    pub fn new(rows: Vec<ForecastPoint>, history_len: usize, weekly: bool, yearly: bool) -> Self {
        let history_len = history_len.min(rows.len());
        Self {
            rows,
            history_len,
            weekly,
            yearly,
        }
    }

    pub fn rows(&self) -> &[ForecastPoint] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows covering the training history.
    pub fn history_len(&self) -> usize {
        self.history_len
    }

    pub fn history(&self) -> &[ForecastPoint] {
        &self.rows[..self.history_len]
    }

    pub fn future(&self) -> &[ForecastPoint] {
        &self.rows[self.history_len..]
    }

    pub fn has_weekly(&self) -> bool {
        self.weekly
    }

    pub fn has_yearly(&self) -> bool {
        self.yearly
    }

    /// The last `n` rows.
    pub fn tail(&self, n: usize) -> &[ForecastPoint] {
        let skip = self.rows.len().saturating_sub(n);
        &self.rows[skip..]
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.ds)
    }

    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let column = |f: fn(&ForecastPoint) -> f64| -> Vec<f64> { self.rows.iter().map(f).collect() };
        let [ds, trend, trend_lower, trend_upper, weekly, yearly, additive, lower, upper, yhat] =
            FORECAST_COLUMNS;

        let df = DataFrame::new(vec![
            Series::new(ds.into(), self.rows.iter().map(|r| r.ds).collect::<Vec<_>>()).into(),
            Series::new(trend.into(), column(|r| r.trend)).into(),
            Series::new(trend_lower.into(), column(|r| r.trend_lower)).into(),
            Series::new(trend_upper.into(), column(|r| r.trend_upper)).into(),
            Series::new(weekly.into(), column(|r| r.weekly)).into(),
            Series::new(yearly.into(), column(|r| r.yearly)).into(),
            Series::new(additive.into(), column(|r| r.additive_terms)).into(),
            Series::new(lower.into(), column(|r| r.yhat_lower)).into(),
            Series::new(upper.into(), column(|r| r.yhat_upper)).into(),
            Series::new(yhat.into(), column(|r| r.yhat)).into(),
        ])?;
        Ok(df)
    }
}
