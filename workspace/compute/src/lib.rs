pub mod error;
pub mod forecast;
pub mod linalg;
pub mod model;
pub mod training;

use polars::prelude::DataFrame;
use tracing::{debug, instrument};

use error::Result;
use forecast::ForecastTable;
use model::{AdditiveModel, ModelConfig};
use training::{TrainingSet, build_training_frame};

/// Returns the model configured the way the dashboard uses it.
///
/// Trend changepoints, weekly and yearly seasonality are detected from the
/// history; intervals cover 80% and come from 1000 simulated paths.
pub fn default_model() -> AdditiveModel {
    AdditiveModel::new(ModelConfig::default())
}

/// Fits `model` to one column of a price table and forecasts `horizon_days`
/// calendar days past its last date.
///
/// The returned table covers every historical date plus the horizon.
#[instrument(skip(model, prices), fields(rows = prices.height()))]
pub fn forecast_prices(
    model: &AdditiveModel,
    prices: &DataFrame,
    date_column: &str,
    value_column: &str,
    horizon_days: u32,
) -> Result<ForecastTable> {
    let frame = build_training_frame(prices, date_column, value_column)?;
    let training = TrainingSet::from_frame(&frame)?;
    let fitted = model.fit(&training)?;
    let table = fitted.forecast(horizon_days)?;
    debug!(
        "Forecast {} rows ({} historical) through {:?}",
        table.len(),
        table.history_len(),
        table.last_date()
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use common::PriceRecord;
    use market::PriceHistory;
    use market::history::{CLOSE_COLUMN, DATE_COLUMN};

    fn prices(days: i64) -> DataFrame {
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let records = (0..days)
            .map(|i| {
                let close = 100.0 + 0.1 * i as f64 + (i % 5) as f64;
                PriceRecord {
                    date: start + Duration::days(i),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    adj_close: close,
                    volume: 1_000,
                }
            })
            .collect();
        PriceHistory::new("TEST", records).to_dataframe().unwrap()
    }

    fn quick_model() -> AdditiveModel {
        AdditiveModel::new(ModelConfig {
            uncertainty_samples: 100,
            ..ModelConfig::default()
        })
    }

    #[test]
    fn default_model_uses_default_config() {
        assert_eq!(default_model().config(), &ModelConfig::default());
    }

    #[test]
    fn forecast_covers_history_and_horizon() {
        let table =
            forecast_prices(&quick_model(), &prices(120), DATE_COLUMN, CLOSE_COLUMN, 365).unwrap();

        assert_eq!(table.len(), 120 + 365);
        assert_eq!(table.history_len(), 120);
        assert_eq!(
            table.last_date(),
            Some(NaiveDate::from_ymd_opt(2022, 1, 3).unwrap() + Duration::days(119 + 365))
        );
        for row in table.rows() {
            assert!(row.yhat.is_finite());
            assert!(row.yhat_lower <= row.yhat_upper);
        }
    }

    #[test]
    fn forecast_rejects_tiny_history() {
        let err = forecast_prices(&quick_model(), &prices(1), DATE_COLUMN, CLOSE_COLUMN, 30)
            .unwrap_err();
        assert!(err.is_insufficient_data());
    }
}
