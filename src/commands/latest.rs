//! Latest-price check
//!
//! Asks the provider for a short recent window of one symbol and prints the
//! newest bar. Writes nothing.
//!
//! Usage:
//! - Default: `cryptosnap latest` (BTC-USD, last 5 days)
//! - Other symbol: `cryptosnap latest ETH-USD --days 10`

use chrono::Local;

use crate::error::{AppError, Result};
use crate::models::Observation;
use crate::services::{FetchRange, MarketDataProvider, ProviderConfig, YahooFinanceClient};

/// Summary of the newest available bar
#[derive(Debug, Clone, PartialEq)]
pub struct LatestSummary {
    pub symbol: String,
    pub latest: Observation,
    pub points_in_window: usize,
}

/// Fetch the window and pick the newest observation
pub async fn fetch_latest<P: MarketDataProvider>(provider: &mut P, symbol: &str, days: u32) -> Result<LatestSummary> {
    let observations = provider.fetch_history(symbol, FetchRange::RecentDays(days)).await?;
    let latest = observations
        .last()
        .cloned()
        .ok_or_else(|| AppError::NoData(symbol.to_string()))?;

    Ok(LatestSummary {
        symbol: symbol.to_string(),
        latest,
        points_in_window: observations.len(),
    })
}

pub fn run(symbol: String, days: u32) {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("❌ Failed to create async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(async {
        let mut client = YahooFinanceClient::new(ProviderConfig::default())?;
        fetch_latest(&mut client, &symbol, days).await
    });

    match result {
        Ok(summary) => {
            println!("📅 Most recent {} data from Yahoo Finance:", summary.symbol);
            println!("Latest date: {}", summary.latest.time.with_timezone(&Local));
            println!("Latest price: ${:.2}", summary.latest.close);
            println!("Data points in last {} days: {}", days, summary.points_in_window);
            println!("Current time: {}", Local::now());
        }
        Err(e) => {
            eprintln!("❌ Failed to fetch {}: {}", symbol, e);
            std::process::exit(1);
        }
    }
}
