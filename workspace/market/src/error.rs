use thiserror::Error;
use tracing::error;

/// Error types for the market data module
#[derive(Error, Debug, Clone)]
pub enum MarketError {
    /// The HTTP request could not be sent or its body not read
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The response body was not the expected JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// The upstream API answered with an error object
    #[error("API error [{code}]: {description}")]
    Api { code: String, description: String },

    /// The upstream API returned no usable rows
    #[error("No data returned for {0}")]
    NoData(String),

    /// The request parameters were rejected before sending
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Error from Polars DataFrame operations
    #[error("DataFrame error: {0}")]
    DataFrame(String),
}

impl MarketError {
    /// Whether the upstream source has nothing for the requested ticker.
    pub fn is_not_found(&self) -> bool {
        match self {
            MarketError::NoData(_) => true,
            MarketError::Api { code, .. } => code.eq_ignore_ascii_case("Not Found"),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for MarketError {
    fn from(error: reqwest::Error) -> Self {
        let err = MarketError::RequestFailed(error.to_string());
        error!(?err, "HTTP request error");
        err
    }
}

impl From<polars::error::PolarsError> for MarketError {
    fn from(error: polars::error::PolarsError) -> Self {
        let err = MarketError::DataFrame(error.to_string());
        error!(?err, "DataFrame error");
        err
    }
}

/// Type alias for Result with MarketError
pub type Result<T> = std::result::Result<T, MarketError>;
