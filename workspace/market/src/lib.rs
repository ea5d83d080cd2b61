//! Market data acquisition.
//!
//! Downloads daily price history for a ticker from a [`PriceSource`]. The
//! production source is [`YahooFinance`]; tests plug in their own sources.

pub mod error;
pub mod history;
pub mod yahoo;

pub use error::{MarketError, Result};
pub use history::PriceHistory;
pub use yahoo::YahooFinance;

use async_trait::async_trait;
use chrono::NaiveDate;

/// A provider of daily price history.
///
/// `end` is exclusive: the returned history covers `[start, end)`.
#[async_trait]
pub trait PriceSource: Send + Sync + std::fmt::Debug {
    async fn fetch_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceHistory>;
}
