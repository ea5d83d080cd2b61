use anyhow::Result;
use tracing::{debug, error, info, trace};

use crate::config::{Settings, initialize_app_state};
use crate::helpers::controls::{horizon_days, resolve_ticker};
use crate::helpers::data::{load_data, run_forecast};

/// Runs the dashboard flow once for `ticker` and prints both table tails to stdout.
pub async fn forecast(settings: Settings, ticker: &str, years: u32, tail: usize) -> Result<()> {
    trace!("Entering forecast function");
    let ticker = resolve_ticker(None, Some(ticker));
    let horizon = horizon_days(years);
    info!("Forecasting {} for {} years ({} days)", ticker, years, horizon);

    let state = initialize_app_state(settings)?;

    let history = match load_data(&state, &ticker).await {
        Ok(history) => history,
        Err(e) => {
            error!("Failed to load price history of {}: {}", ticker, e);
            return Err(e.into());
        }
    };
    debug!("Loaded {} records", history.len());

    println!("Raw data ({})", ticker);
    println!("{}", history.to_dataframe()?.tail(Some(tail)));

    let table = match run_forecast(history, horizon).await {
        Ok(table) => table,
        Err(e) => {
            error!("Failed to forecast {}: {}", ticker, e);
            return Err(e.into());
        }
    };

    println!("Forecast data");
    println!("{}", table.to_dataframe()?.tail(Some(tail)));
    if let Some(last) = table.last_date() {
        println!("Forecast for {} years runs through {}", years, last);
    }

    info!("Forecast of {} finished with {} rows", ticker, table.len());
    Ok(())
}
