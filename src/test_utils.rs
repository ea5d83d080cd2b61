#[cfg(test)]
pub mod test_utils {
    use crate::config::{Settings, build_app_state};
    use crate::router::create_router;
    use crate::schemas::AppState;
    use async_trait::async_trait;
    use axum::Router;
    use chrono::{Datelike, Duration, NaiveDate, Weekday};
    use common::PriceRecord;
    use market::{MarketError, PriceHistory, PriceSource};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Ticker the static source answers with "Not Found".
    pub const UNKNOWN_TICKER: &str = "ZZZZ";

    /// Weekday-only closing prices with a trend and a small oscillation, starting 2023-01-02.
    pub fn synthetic_history(ticker: &str, trading_days: usize) -> PriceHistory {
        let mut date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let mut records = Vec::with_capacity(trading_days);
        while records.len() < trading_days {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                let i = records.len() as f64;
                let close = 100.0 + 0.25 * i + 2.0 * (i / 6.0).sin();
                records.push(PriceRecord {
                    date,
                    open: close - 0.4,
                    high: close + 1.2,
                    low: close - 1.3,
                    close,
                    adj_close: close,
                    volume: 1_000_000 + (i as u64) * 10,
                });
            }
            date += Duration::days(1);
        }
        PriceHistory::new(ticker, records)
    }

    /// Answers every ticker with the same history, except [`UNKNOWN_TICKER`].
    #[derive(Debug)]
    pub struct StaticSource {
        trading_days: usize,
    }

    impl StaticSource {
        pub fn new(trading_days: usize) -> Self {
            Self { trading_days }
        }
    }

    #[async_trait]
    impl PriceSource for StaticSource {
        async fn fetch_history(
            &self,
            ticker: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> market::Result<PriceHistory> {
            if ticker == UNKNOWN_TICKER {
                return Err(MarketError::Api {
                    code: "Not Found".to_string(),
                    description: "No data found, symbol may be delisted".to_string(),
                });
            }
            Ok(synthetic_history(ticker, self.trading_days))
        }
    }

    /// Counts downloads; answers with a fixed history or always fails.
    #[derive(Debug)]
    pub struct CountingSource {
        history: Option<PriceHistory>,
        calls: AtomicUsize,
    }

    impl CountingSource {
        pub fn new(history: PriceHistory) -> Self {
            Self {
                history: Some(history),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing() -> Self {
            Self {
                history: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceSource for CountingSource {
        async fn fetch_history(
            &self,
            ticker: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> market::Result<PriceHistory> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.history
                .clone()
                .ok_or_else(|| MarketError::NoData(ticker.to_string()))
        }
    }

    /// Create AppState for testing around the given source
    pub fn setup_state_with_source(source: Arc<dyn PriceSource>) -> AppState {
        build_app_state(Settings::default(), source)
    }

    /// Create AppState for testing
    pub fn setup_test_app_state() -> AppState {
        setup_state_with_source(Arc::new(StaticSource::new(120)))
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    pub fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub fn setup_test_app() -> Router {
        create_router(setup_test_app_state())
    }

    /// Create axum app for testing over a given state
    pub fn setup_test_app_with_state(state: AppState) -> Router {
        create_router(state)
    }
}
