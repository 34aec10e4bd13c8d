//! Per-asset snapshot model
//!
//! A snapshot is the JSON document the front-end reads for one asset:
//! metadata plus two parallel `[timestamp_ms, value]` series. `prices` and
//! `total_volumes` always have the same length and the same timestamp at
//! every index.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::{AssetEntry, Observation};

/// One `[timestamp_ms, value]` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint(pub i64, pub f64);

impl SeriesPoint {
    pub fn timestamp_ms(&self) -> i64 {
        self.0
    }

    pub fn value(&self) -> f64 {
        self.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub symbol: String,
    pub crypto_id: String,
    pub name: String,
    pub last_updated: String,
    pub data_points: usize,
    pub earliest_date: String,
    pub latest_date: String,
    pub prices: Vec<SeriesPoint>,
    pub total_volumes: Vec<SeriesPoint>,
}

/// Local wall-clock time without offset, e.g. `2026-10-19T08:15:02.123456`
pub fn format_local_timestamp(now: DateTime<Local>) -> String {
    now.naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Observation time with explicit offset, e.g. `2014-09-17T00:00:00+00:00`
pub fn format_observation_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, false)
}

impl Snapshot {
    /// Build a snapshot from a full-history response
    ///
    /// Observations are taken in the order the provider returned them
    /// (ascending). An empty response is an error: there is nothing to persist.
    pub fn from_observations(
        asset: &AssetEntry,
        observations: &[Observation],
        now: DateTime<Local>,
    ) -> Result<Self> {
        let (first, last) = match (observations.first(), observations.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(AppError::NoData(asset.symbol.clone())),
        };

        let prices: Vec<SeriesPoint> = observations
            .iter()
            .map(|o| SeriesPoint(o.timestamp_ms(), o.close))
            .collect();
        let total_volumes: Vec<SeriesPoint> = observations
            .iter()
            .map(|o| SeriesPoint(o.timestamp_ms(), o.volume))
            .collect();

        Ok(Self {
            symbol: asset.symbol.clone(),
            crypto_id: asset.id.clone(),
            name: asset.display_name(),
            last_updated: format_local_timestamp(now),
            data_points: prices.len(),
            earliest_date: format_observation_time(first.time),
            latest_date: format_observation_time(last.time),
            prices,
            total_volumes,
        })
    }

    /// Append delta observations, returning how many were added
    ///
    /// Observations at or before the current last timestamp are dropped so
    /// the series stay strictly increasing. Metadata is only refreshed when
    /// something was appended.
    pub fn append_observations(&mut self, observations: &[Observation], now: DateTime<Local>) -> usize {
        let mut last_ms = self.prices.last().map(|p| p.timestamp_ms());
        let mut appended = 0;

        for obs in observations {
            let ts = obs.timestamp_ms();
            if let Some(last) = last_ms {
                if ts <= last {
                    debug!("{}: skipping already stored observation at {}", self.symbol, ts);
                    continue;
                }
            }

            self.prices.push(SeriesPoint(ts, obs.close));
            self.total_volumes.push(SeriesPoint(ts, obs.volume));
            last_ms = Some(ts);
            appended += 1;

            if appended == 1 && self.prices.len() == 1 {
                self.earliest_date = format_observation_time(obs.time);
            }
            self.latest_date = format_observation_time(obs.time);
        }

        if appended > 0 {
            self.last_updated = format_local_timestamp(now);
            self.data_points = self.prices.len();
        }

        appended
    }

    /// Timestamp of the final price observation, if there is one
    pub fn last_observed(&self) -> Option<DateTime<Utc>> {
        let last = self.prices.last()?;
        DateTime::from_timestamp_millis(last.timestamp_ms())
    }

    /// Both series have equal length and matching timestamps at every index
    pub fn is_aligned(&self) -> bool {
        self.prices.len() == self.total_volumes.len()
            && self
                .prices
                .iter()
                .zip(&self.total_volumes)
                .all(|(p, v)| p.timestamp_ms() == v.timestamp_ms())
    }

    /// Timestamps strictly increase along the series
    pub fn is_strictly_increasing(&self) -> bool {
        self.prices
            .windows(2)
            .all(|w| w[0].timestamp_ms() < w[1].timestamp_ms())
    }
}
