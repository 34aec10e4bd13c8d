use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::constants::{DEFAULT_MAX_RETRIES, DEFAULT_LATEST_DAYS, DEFAULT_LATEST_SYMBOL, DEFAULT_TIMEOUT_SECS};

#[derive(Parser)]
#[command(name = "cryptosnap")]
#[command(about = "Refresh daily crypto price snapshots for a static front-end", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download new history and rewrite snapshots plus index.json
    Update {
        /// Output directory (defaults to $CRYPTOSNAP_DATA_DIR or public/data)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// JSON file with [{"symbol": "BTC-USD", "id": "bitcoin"}, ...]
        #[arg(short, long)]
        assets: Option<PathBuf>,

        /// Only update these symbols (repeatable)
        #[arg(short, long = "symbol")]
        symbols: Vec<String>,

        /// Ignore existing snapshots and fetch full history
        #[arg(long)]
        full: bool,

        /// Per-request timeout for the data provider
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,

        /// Attempts per provider request
        #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
        max_retries: u32,

        /// Exit with status 2 if any asset failed
        #[arg(long)]
        fail_on_error: bool,
    },
    /// Print the most recent available data point for a symbol
    Latest {
        #[arg(default_value = DEFAULT_LATEST_SYMBOL)]
        symbol: String,

        /// Size of the recent window, in days
        #[arg(long, default_value_t = DEFAULT_LATEST_DAYS)]
        days: u32,
    },
    /// Show what the last update run left on disk
    Status {
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        #[arg(short, long)]
        assets: Option<PathBuf>,
    },
}

pub fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Update {
            data_dir,
            assets,
            symbols,
            full,
            timeout_secs,
            max_retries,
            fail_on_error,
        } => {
            commands::update::run(commands::update::UpdateOptions {
                data_dir,
                assets_file: assets,
                symbols,
                full,
                timeout_secs,
                max_retries,
                fail_on_error,
            });
        }
        Commands::Latest { symbol, days } => {
            commands::latest::run(symbol, days);
        }
        Commands::Status { data_dir, assets } => {
            commands::status::run(data_dir, assets);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_args() {
        let cli = Cli::try_parse_from([
            "cryptosnap", "update", "--symbol", "BTC-USD", "-s", "ETH-USD", "--full", "--data-dir", "/tmp/out",
        ])
        .unwrap();

        match cli.command {
            Commands::Update {
                symbols,
                full,
                data_dir,
                timeout_secs,
                fail_on_error,
                ..
            } => {
                assert_eq!(symbols, vec!["BTC-USD", "ETH-USD"]);
                assert!(full);
                assert!(!fail_on_error);
                assert_eq!(data_dir, Some(PathBuf::from("/tmp/out")));
                assert_eq!(timeout_secs, DEFAULT_TIMEOUT_SECS);
            }
            _ => panic!("expected update"),
        }
    }

    #[test]
    fn test_latest_defaults() {
        let cli = Cli::try_parse_from(["cryptosnap", "latest"]).unwrap();
        match cli.command {
            Commands::Latest { symbol, days } => {
                assert_eq!(symbol, "BTC-USD");
                assert_eq!(days, 5);
            }
            _ => panic!("expected latest"),
        }
    }
}
