use anyhow::Result;
use chrono::NaiveDate;
use market::{PriceSource, YahooFinance};
use moka::future::Cache;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::schemas::AppState;

/// Application settings, read from defaults overridden by `STOCKSAGE_*` environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Address the web server binds to
    pub bind_address: String,
    /// First day of the downloaded price history
    pub start_date: NaiveDate,
    /// Base URL of the Yahoo Finance chart endpoint
    pub yahoo_base_url: String,
    /// Timeout of a single download, in seconds
    pub yahoo_timeout_secs: u64,
    /// Maximum number of tickers kept in the download cache
    pub cache_max_capacity: u64,
    /// Lifetime of a cached download, in seconds
    pub cache_ttl_secs: u64,
    /// Rows shown in the raw and forecast data tables
    pub table_tail: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            start_date: NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default(),
            yahoo_base_url: market::yahoo::DEFAULT_BASE_URL.to_string(),
            yahoo_timeout_secs: 20,
            cache_max_capacity: 100,
            cache_ttl_secs: 3600,
            table_tail: 5,
        }
    }
}

impl Settings {
    /// Loads settings; `STOCKSAGE_START_DATE=2018-01-01` overrides `start_date` and so on.
    pub fn load() -> Result<Self> {
        let defaults = Settings::default();
        let settings = config::Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("start_date", defaults.start_date.to_string())?
            .set_default("yahoo_base_url", defaults.yahoo_base_url)?
            .set_default("yahoo_timeout_secs", defaults.yahoo_timeout_secs)?
            .set_default("cache_max_capacity", defaults.cache_max_capacity)?
            .set_default("cache_ttl_secs", defaults.cache_ttl_secs)?
            .set_default("table_tail", defaults.table_tail as u64)?
            .add_source(config::Environment::with_prefix("STOCKSAGE").try_parsing(true))
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }
}

/// Builds the application state around an arbitrary price source.
pub fn build_app_state(settings: Settings, source: Arc<dyn PriceSource>) -> AppState {
    let cache = Cache::builder()
        .max_capacity(settings.cache_max_capacity)
        .time_to_live(Duration::from_secs(settings.cache_ttl_secs))
        .build();

    AppState {
        source,
        cache,
        generation: Arc::new(AtomicU64::new(0)),
        loaded_once: Arc::new(AtomicBool::new(false)),
        settings: Arc::new(settings),
    }
}

/// Initialize application state backed by Yahoo Finance
pub fn initialize_app_state(settings: Settings) -> Result<AppState> {
    info!(
        "Using Yahoo Finance at {} with a {}s timeout",
        settings.yahoo_base_url, settings.yahoo_timeout_secs
    );
    let source = YahooFinance::new(
        settings.yahoo_base_url.clone(),
        Duration::from_secs(settings.yahoo_timeout_secs),
    )?;

    Ok(build_app_state(settings, Arc::new(source)))
}
