use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commands;

use commands::{forecast, serve};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "stocksage")]
#[command(about = "StockSage stock price forecasting dashboard and CLI")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Bind address for the web server
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:3000, 127.0.0.1:8080).
        /// Defaults to STOCKSAGE_BIND_ADDRESS or 0.0.0.0:3000.
        #[arg(short, long, env = "BIND_ADDRESS")]
        bind_address: Option<String>,
    },
    /// Download a ticker, fit the model and print the tails of the price and forecast tables
    Forecast {
        /// Ticker symbol, e.g. GOOG; lowercase is accepted
        #[arg(short, long)]
        ticker: String,

        /// Forecast horizon in years
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=4))]
        years: u32,

        /// Number of rows to print from each table
        #[arg(long, default_value_t = 5)]
        tail: usize,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut settings = Settings::load()?;
        match self.command {
            Commands::Serve { bind_address } => {
                if let Some(bind_address) = bind_address {
                    settings.bind_address = bind_address;
                }
                serve(settings).await?;
            }
            Commands::Forecast { ticker, years, tail } => {
                forecast(settings, &ticker, years, tail).await?;
            }
        }
        Ok(())
    }
}
