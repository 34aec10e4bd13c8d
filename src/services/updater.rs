//! Historical data updater
//!
//! Walks the asset table in order. For each asset: load the prior snapshot,
//! decide the update mode, fetch, merge or build, persist. Every asset ends in
//! exactly one of `UpToDate`, `Updated` or `Failed`; a failure never stops the
//! run. The index is written once at the end, whatever happened.

use chrono::{DateTime, Local};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::models::{
    decide_update_mode, AssetEntry, AssetTable, PriorSnapshot, Snapshot, SnapshotIndex, UpdateMode,
};
use crate::services::provider::{FetchRange, MarketDataProvider};
use crate::services::snapshot_store::{ensure_data_dir, load_snapshot, save_index, save_snapshot};

/// Configuration for an update run
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// Directory holding `<crypto_id>.json` and `index.json`
    pub data_dir: PathBuf,

    /// Assets to refresh, in processing order
    pub assets: AssetTable,

    /// Full table `index.json` describes; `assets` may be a subset of it
    pub catalog: AssetTable,

    /// Ignore existing snapshots and re-download full history
    pub force_full: bool,
}

/// Terminal state of one asset after a run
#[derive(Debug, Clone, PartialEq)]
pub enum AssetStatus {
    /// Nothing to fetch, or the provider had nothing newer
    UpToDate { detail: String },
    /// Snapshot written
    Updated {
        new_points: usize,
        total_points: usize,
        full: bool,
    },
    Failed { error: String },
}

impl AssetStatus {
    pub fn is_success(&self) -> bool {
        !matches!(self, AssetStatus::Failed { .. })
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, Default)]
pub struct UpdateReport {
    pub outcomes: Vec<(AssetEntry, AssetStatus)>,
}

impl UpdateReport {
    /// Crypto ids of assets that ended up current, in processing order
    pub fn successful_ids(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|(_, status)| status.is_success())
            .map(|(asset, _)| asset.id.clone())
            .collect()
    }

    pub fn failed_symbols(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|(_, status)| !status.is_success())
            .map(|(asset, _)| asset.symbol.clone())
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|(_, status)| !status.is_success())
    }
}

pub struct Updater<P: MarketDataProvider> {
    config: UpdateConfig,
    provider: P,
}

impl<P: MarketDataProvider> Updater<P> {
    pub fn new(config: UpdateConfig, provider: P) -> Self {
        Self { config, provider }
    }

    /// Run against the current local time
    pub async fn run(&mut self) -> Result<UpdateReport> {
        self.run_at(Local::now()).await
    }

    /// Run as if the current time were `now`
    ///
    /// Only failure to create the data directory or write the index is
    /// returned as an error; per-asset problems end up in the report.
    pub async fn run_at(&mut self, now: DateTime<Local>) -> Result<UpdateReport> {
        ensure_data_dir(&self.config.data_dir)?;

        let total = self.config.assets.len();
        println!("🚀 Starting crypto data update...");
        println!("📊 Processing {} cryptocurrencies", total);
        println!("{}", "=".repeat(60));

        let mut report = UpdateReport::default();
        let assets = self.config.assets.entries().to_vec();

        for (idx, asset) in assets.into_iter().enumerate() {
            let status = match self.process_asset(&asset, now).await {
                Ok(status) => status,
                Err(e) => {
                    warn!("{} failed: {}", asset.symbol, e);
                    AssetStatus::Failed { error: e.to_string() }
                }
            };

            println!(
                "[{:>2}/{}] {} ({}) {}",
                idx + 1,
                total,
                asset.symbol,
                asset.id,
                describe_status(&status)
            );
            report.outcomes.push((asset, status));
        }

        let successful = report.successful_ids();
        let failed = report.failed_symbols();

        println!("{}", "=".repeat(60));
        println!("📊 UPDATE COMPLETE");
        println!("✅ Successful: {} tokens", successful.len());
        println!("❌ Failed: {} tokens", failed.len());
        if !failed.is_empty() {
            println!("Failed tokens: {}", failed.join(", "));
        }

        let index = SnapshotIndex::new(self.available_ids(&report), now);
        save_index(&self.config.data_dir, &index)?;
        println!("📁 Data saved to {}", self.config.data_dir.display());

        Ok(report)
    }

    /// Ids for the index, in catalog order: this run's successes plus any
    /// catalog asset left alone this run whose snapshot still loads
    fn available_ids(&self, report: &UpdateReport) -> Vec<String> {
        let mut ids = Vec::new();

        for entry in self.config.catalog.entries() {
            match report.outcomes.iter().find(|(asset, _)| asset.id == entry.id) {
                Some((_, status)) => {
                    if status.is_success() {
                        ids.push(entry.id.clone());
                    }
                }
                None => match load_snapshot(&self.config.data_dir, &entry.id) {
                    PriorSnapshot::Present(_) => ids.push(entry.id.clone()),
                    PriorSnapshot::Absent => {}
                    PriorSnapshot::Corrupt(reason) => {
                        warn!("{} left out of index, snapshot unreadable: {}", entry.id, reason)
                    }
                },
            }
        }

        for id in report.successful_ids() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        ids
    }

    async fn process_asset(&mut self, asset: &AssetEntry, now: DateTime<Local>) -> Result<AssetStatus> {
        let prior = load_snapshot(&self.config.data_dir, &asset.id);
        let mode = decide_update_mode(&prior, now.date_naive(), self.config.force_full);
        debug!("{}: update mode {:?}", asset.symbol, mode);

        match mode {
            UpdateMode::UpToDate { last_date } => Ok(AssetStatus::UpToDate {
                detail: format!("Up to date ({})", last_date),
            }),
            UpdateMode::Delta { since, days_since } => {
                let mut snapshot = match prior {
                    PriorSnapshot::Present(snapshot) => snapshot,
                    _ => return Err(AppError::Other("delta update without a snapshot".to_string())),
                };

                info!("{}: fetching {} new day(s) since {}", asset.symbol, days_since, since);
                let observations = self
                    .provider
                    .fetch_history(&asset.symbol, FetchRange::Since(since))
                    .await?;

                let added = snapshot.append_observations(&observations, now);
                if added == 0 {
                    return Ok(AssetStatus::UpToDate {
                        detail: "No new data".to_string(),
                    });
                }

                save_snapshot(&self.config.data_dir, &snapshot)?;
                Ok(AssetStatus::Updated {
                    new_points: added,
                    total_points: snapshot.data_points,
                    full: false,
                })
            }
            UpdateMode::Full(reason) => {
                info!("{}: {}", asset.symbol, reason.describe());
                let observations = self.provider.fetch_history(&asset.symbol, FetchRange::Max).await?;
                let snapshot = Snapshot::from_observations(asset, &observations, now)?;

                save_snapshot(&self.config.data_dir, &snapshot)?;
                Ok(AssetStatus::Updated {
                    new_points: snapshot.data_points,
                    total_points: snapshot.data_points,
                    full: true,
                })
            }
        }
    }
}

fn describe_status(status: &AssetStatus) -> String {
    match status {
        AssetStatus::UpToDate { detail } => format!("✅ {}", detail),
        AssetStatus::Updated { new_points, full: true, .. } => format!("📥 ✅ {} days", new_points),
        AssetStatus::Updated {
            new_points,
            total_points,
            full: false,
        } => format!("📈 ✅ Added {} days ({} total)", new_points, total_points),
        AssetStatus::Failed { error } => {
            let short: String = error.chars().take(50).collect();
            format!("❌ Error: {}", short)
        }
    }
}
