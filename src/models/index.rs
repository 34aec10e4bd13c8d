use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::constants::DATA_SOURCE;
use crate::models::snapshot::format_local_timestamp;

/// Summary written to `index.json` after every update run
///
/// Always rebuilt from the current run's outcomes, never merged with a
/// previous index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotIndex {
    pub last_updated: String,
    pub total_tokens: usize,
    pub available_tokens: Vec<String>,
    pub data_source: String,
}

impl SnapshotIndex {
    pub fn new(available_tokens: Vec<String>, now: DateTime<Local>) -> Self {
        Self {
            last_updated: format_local_timestamp(now),
            total_tokens: available_tokens.len(),
            available_tokens,
            data_source: DATA_SOURCE.to_string(),
        }
    }
}
