//! Shaping of price tables into the `(ds, y)` training table.

use chrono::NaiveDate;
use polars::prelude::*;
use tracing::{debug, warn};

use crate::error::{ComputeError, Result};

/// Timestamp column of the training table.
pub const DS_COLUMN: &str = "ds";
/// Value column of the training table.
pub const Y_COLUMN: &str = "y";

/// Days between 0001-01-01 and 1970-01-01, the epoch of polars `Date` values.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Projects a price table onto its date and value columns, renamed to `ds` and `y`.
///
/// The result has exactly two columns and the same rows as `prices`.
pub fn build_training_frame(
    prices: &DataFrame,
    date_column: &str,
    value_column: &str,
) -> Result<DataFrame> {
    if prices.height() == 0 {
        return Err(ComputeError::InsufficientData(
            "price table has no rows".to_string(),
        ));
    }

    let mut df = prices.select([date_column, value_column])?;
    df.rename(date_column, DS_COLUMN.into())?;
    df.rename(value_column, Y_COLUMN.into())?;

    debug!("Built training frame with {} rows", df.height());
    Ok(df)
}

/// Training observations extracted from a `(ds, y)` frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl TrainingSet {
    /// Reads a `(ds, y)` frame. Rows with a null or non-finite value are dropped.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let ds = df
            .column(DS_COLUMN)?
            .as_materialized_series()
            .cast(&DataType::Int32)?;
        let y = df
            .column(Y_COLUMN)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;

        let mut dates = Vec::with_capacity(df.height());
        let mut values = Vec::with_capacity(df.height());
        let mut dropped = 0usize;

        for (day, value) in ds.i32()?.into_iter().zip(y.f64()?.into_iter()) {
            match (day, value) {
                (Some(day), Some(value)) if value.is_finite() => {
                    let date = NaiveDate::from_num_days_from_ce_opt(day + UNIX_EPOCH_DAYS_FROM_CE)
                        .ok_or_else(|| ComputeError::Date(format!("Invalid date value: {}", day)))?;
                    dates.push(date);
                    values.push(value);
                }
                _ => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!("Dropped {} training rows with missing values", dropped);
        }

        Ok(Self { dates, values })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
