pub mod cache;
pub mod dashboard;
pub mod forecast;
pub mod health;
pub mod tickers;
