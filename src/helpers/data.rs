use chrono::Utc;
use compute::default_model;
use compute::forecast::ForecastTable;
use market::history::{CLOSE_COLUMN, DATE_COLUMN};
use market::{MarketError, PriceHistory};
use std::sync::atomic::Ordering;
use tracing::{debug, info, instrument, trace};

use crate::helpers::errors::AppError;
use crate::schemas::AppState;

/// Price history of `ticker` from the configured start date up to today, memoized per ticker.
///
/// Concurrent loads of the same ticker share one download. Failed downloads
/// are not cached.
#[instrument(skip(state))]
pub async fn load_data(state: &AppState, ticker: &str) -> Result<PriceHistory, MarketError> {
    let generation = state.generation.load(Ordering::SeqCst);
    let key = (generation, ticker.to_uppercase());
    if let Some(history) = state.cache.get(&key).await {
        debug!("Cache hit for {} ({} records)", key.1, history.len());
        return Ok(history);
    }

    debug!("Cache miss for {}, downloading", key.1);
    let start = state.settings.start_date;
    let end = Utc::now().date_naive();
    let source = state.source.clone();
    let symbol = key.1.clone();
    let history = state
        .cache
        .try_get_with(key.clone(), async move {
            source.fetch_history(&symbol, start, end).await
        })
        .await
        .map_err(|e| (*e).clone())?;

    // Cleared while downloading: the entry belongs to a dead generation.
    if state.generation.load(Ordering::SeqCst) != generation {
        debug!("Cache cleared during download of {}, dropping entry", key.1);
        state.cache.invalidate(&key).await;
    }

    info!(
        "Loaded {} records for {} ({:?} to {:?})",
        history.len(),
        ticker,
        history.first_date(),
        history.last_date()
    );
    Ok(history)
}

/// Records a successful load; returns true for the first load of the session.
pub fn mark_loaded(state: &AppState) -> bool {
    !state.loaded_once.swap(true, Ordering::SeqCst)
}

/// Drops every memoized download and resets the session flag. Returns the number of dropped entries.
///
/// Downloads still in flight finish for their callers but are not reused afterwards.
pub async fn clear_cache(state: &AppState) -> u64 {
    state.generation.fetch_add(1, Ordering::SeqCst);
    let entries = state.cache.entry_count();
    state.cache.invalidate_all();
    state.cache.run_pending_tasks().await;
    state.loaded_once.store(false, Ordering::SeqCst);
    info!("Cleared download cache ({} entries)", entries);
    entries
}

/// Fits the model to the close prices and forecasts `horizon_days` past the last record.
///
/// The fit runs on the blocking thread pool.
#[instrument(skip(history), fields(ticker = history.ticker(), records = history.len()))]
pub async fn run_forecast(
    history: PriceHistory,
    horizon_days: u32,
) -> Result<ForecastTable, AppError> {
    trace!("Scheduling forecast on the blocking pool");
    let table = tokio::task::spawn_blocking(move || -> Result<ForecastTable, AppError> {
        let prices = history.to_dataframe()?;
        let table = compute::forecast_prices(
            &default_model(),
            &prices,
            DATE_COLUMN,
            CLOSE_COLUMN,
            horizon_days,
        )?;
        Ok(table)
    })
    .await
    .map_err(|e| AppError::Task(e.to_string()))??;

    debug!("Forecast finished with {} rows", table.len());
    Ok(table)
}
