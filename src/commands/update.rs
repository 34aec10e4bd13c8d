//! Snapshot update command
//!
//! Refreshes `<crypto_id>.json` for every asset in the table and rewrites
//! `index.json`. Assets with no snapshot get their full history; assets with
//! one only get the days since their last observation.
//!
//! Usage:
//! - All built-in assets: `cryptosnap update`
//! - A subset: `cryptosnap update --symbol BTC-USD --symbol ETH-USD`
//! - Custom table: `cryptosnap update --assets my_assets.json`
//! - Rebuild everything: `cryptosnap update --full`

use std::path::PathBuf;

use crate::models::AssetTable;
use crate::services::{ProviderConfig, UpdateConfig, Updater, YahooFinanceClient};
use crate::utils::get_data_dir;

/// Options collected from the command line
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub data_dir: Option<PathBuf>,
    pub assets_file: Option<PathBuf>,
    pub symbols: Vec<String>,
    pub full: bool,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub fail_on_error: bool,
}

/// Exit code used when `--fail-on-error` is set and some asset failed
const PARTIAL_FAILURE_EXIT_CODE: i32 = 2;

pub fn run(options: UpdateOptions) {
    let assets = match &options.assets_file {
        Some(path) => match AssetTable::load(path) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("❌ Failed to load asset table: {}", e);
                std::process::exit(1);
            }
        },
        None => AssetTable::builtin(),
    };

    let catalog = assets.clone();
    let assets = match assets.restrict_to(&options.symbols) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if assets.is_empty() {
        eprintln!("❌ Asset table is empty, nothing to update");
        std::process::exit(1);
    }

    let config = UpdateConfig {
        data_dir: options.data_dir.clone().unwrap_or_else(get_data_dir),
        assets,
        catalog,
        force_full: options.full,
    };

    let provider_config = ProviderConfig {
        timeout_secs: options.timeout_secs,
        max_retries: options.max_retries,
        ..ProviderConfig::default()
    };

    let provider = match YahooFinanceClient::new(provider_config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Failed to create Yahoo Finance client: {}", e);
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("❌ Failed to create async runtime: {}", e);
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(async {
        let mut updater = Updater::new(config, provider);
        updater.run().await
    });

    match result {
        Ok(report) => {
            if report.has_failures() && options.fail_on_error {
                std::process::exit(PARTIAL_FAILURE_EXIT_CODE);
            }
        }
        Err(e) => {
            eprintln!("\n❌ Update failed: {}", e);
            std::process::exit(1);
        }
    }
}
