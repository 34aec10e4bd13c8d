//! Update-mode decision
//!
//! Maps what is on disk for an asset to what the updater must fetch.
//! Day arithmetic uses local calendar dates on both sides and ignores the
//! time of day.

use chrono::{DateTime, Days, Local, NaiveDate, TimeZone, Utc};

use crate::models::Snapshot;

/// Result of loading a previously persisted snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum PriorSnapshot {
    /// No file for this asset
    Absent,
    /// File exists but could not be read or parsed
    Corrupt(String),
    Present(Snapshot),
}

/// Why a full download is needed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullReason {
    NoSnapshot,
    Unreadable,
    NoLastObservation,
    Forced,
}

impl FullReason {
    pub fn describe(&self) -> &'static str {
        match self {
            FullReason::NoSnapshot => "Full download",
            FullReason::Unreadable => "Unreadable data, full download",
            FullReason::NoLastObservation => "Corrupted data, full download",
            FullReason::Forced => "Forced full download",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateMode {
    /// Last observation is on today's date (or later)
    UpToDate { last_date: NaiveDate },
    /// Fetch everything from `since` until now
    Delta {
        since: DateTime<Utc>,
        days_since: i64,
    },
    Full(FullReason),
}

/// Decide how to refresh an asset given its prior snapshot and today's date
pub fn decide_update_mode(prior: &PriorSnapshot, today: NaiveDate, force_full: bool) -> UpdateMode {
    if force_full {
        return UpdateMode::Full(FullReason::Forced);
    }

    let snapshot = match prior {
        PriorSnapshot::Absent => return UpdateMode::Full(FullReason::NoSnapshot),
        PriorSnapshot::Corrupt(_) => return UpdateMode::Full(FullReason::Unreadable),
        PriorSnapshot::Present(snapshot) => snapshot,
    };

    let last_date = match snapshot.last_observed() {
        Some(last) => last.with_timezone(&Local).date_naive(),
        None => return UpdateMode::Full(FullReason::NoLastObservation),
    };

    let days_since = (today - last_date).num_days();
    if days_since <= 0 {
        return UpdateMode::UpToDate { last_date };
    }

    match last_date.checked_add_days(Days::new(1)) {
        Some(next_day) => UpdateMode::Delta {
            since: local_midnight_utc(next_day),
            days_since,
        },
        None => UpdateMode::Full(FullReason::NoLastObservation),
    }
}

/// Start of a local calendar day, expressed in UTC
fn local_midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    match Local.from_local_datetime(&naive).earliest() {
        Some(local) => local.with_timezone(&Utc),
        // midnight skipped by a DST jump
        None => naive.and_utc(),
    }
}
