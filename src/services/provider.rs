use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Observation;

/// Window of daily history to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRange {
    /// Everything the provider has
    Max,
    /// From the given instant up to now
    Since(DateTime<Utc>),
    /// The most recent N calendar days
    RecentDays(u32),
}

impl std::fmt::Display for FetchRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchRange::Max => write!(f, "max"),
            FetchRange::Since(start) => write!(f, "since {}", start.format("%Y-%m-%d")),
            FetchRange::RecentDays(days) => write!(f, "last {}d", days),
        }
    }
}

/// Source of daily price/volume history
///
/// Implementations return observations sorted oldest first, with volume
/// already normalised (missing -> 0).
#[allow(async_fn_in_trait)]
pub trait MarketDataProvider {
    async fn fetch_history(&mut self, symbol: &str, range: FetchRange) -> Result<Vec<Observation>>;
}
