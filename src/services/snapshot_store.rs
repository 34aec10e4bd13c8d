//! Snapshot persistence - one compact JSON file per asset plus `index.json`
//!
//! Writes overwrite in place. A file left half-written by a crash fails to
//! parse on the next run and is reported as `PriorSnapshot::Corrupt`, which
//! leads to a full re-download.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::INDEX_FILENAME;
use crate::error::{AppError, Result};
use crate::models::{PriorSnapshot, Snapshot, SnapshotIndex};

/// Path of an asset's snapshot file
pub fn snapshot_path(data_dir: &Path, crypto_id: &str) -> PathBuf {
    data_dir.join(format!("{}.json", crypto_id))
}

/// Path of the index file
pub fn index_path(data_dir: &Path) -> PathBuf {
    data_dir.join(INDEX_FILENAME)
}

/// Load the previously persisted snapshot for an asset
pub fn load_snapshot(data_dir: &Path, crypto_id: &str) -> PriorSnapshot {
    let path = snapshot_path(data_dir, crypto_id);

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No existing snapshot at {}", path.display());
            return PriorSnapshot::Absent;
        }
        Err(e) => {
            warn!("Failed to read snapshot {}: {}", path.display(), e);
            return PriorSnapshot::Corrupt(e.to_string());
        }
    };

    match serde_json::from_str::<Snapshot>(&content) {
        Ok(snapshot) if snapshot.is_aligned() => {
            debug!("Loaded snapshot {} ({} points)", path.display(), snapshot.prices.len());
            PriorSnapshot::Present(snapshot)
        }
        Ok(snapshot) => {
            let reason = format!(
                "prices/total_volumes misaligned ({} vs {})",
                snapshot.prices.len(),
                snapshot.total_volumes.len()
            );
            warn!("Snapshot {} is corrupt: {}", path.display(), reason);
            PriorSnapshot::Corrupt(reason)
        }
        Err(e) => {
            warn!("Failed to parse snapshot {}: {}", path.display(), e);
            PriorSnapshot::Corrupt(e.to_string())
        }
    }
}

/// Write an asset's snapshot as compact JSON, replacing any previous file
pub fn save_snapshot(data_dir: &Path, snapshot: &Snapshot) -> Result<()> {
    let path = snapshot_path(data_dir, &snapshot.crypto_id);
    let content = serde_json::to_string(snapshot)?;
    fs::write(&path, content)
        .map_err(|e| AppError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    debug!("Saved snapshot to {}", path.display());
    Ok(())
}

/// Write the index as pretty JSON
pub fn save_index(data_dir: &Path, index: &SnapshotIndex) -> Result<()> {
    let path = index_path(data_dir);
    let content = serde_json::to_string_pretty(index)?;
    fs::write(&path, content)
        .map_err(|e| AppError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
    debug!("Saved index to {}", path.display());
    Ok(())
}

/// Read the index, if one has been written
pub fn load_index(data_dir: &Path) -> Result<Option<SnapshotIndex>> {
    let path = index_path(data_dir);
    match fs::read_to_string(&path) {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::Io(format!("Failed to read {}: {}", path.display(), e))),
    }
}

/// Create the data directory (and parents) if missing
pub fn ensure_data_dir(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)
        .map_err(|e| AppError::Io(format!("Failed to create {}: {}", data_dir.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetEntry, Observation};
    use chrono::{DateTime, Local};
    use tempfile::tempdir;

    fn sample_snapshot() -> Snapshot {
        let obs: Vec<Observation> = (0..4)
            .map(|n| {
                let time = DateTime::from_timestamp(1_410_912_000 + n * 86_400, 0).unwrap();
                // awkward decimals to exercise float round-tripping
                Observation::new(time, 457.334015 + n as f64 * 0.1, Some(21056800.0 / 3.0))
            })
            .collect();
        Snapshot::from_observations(&AssetEntry::new("BTC-USD", "bitcoin"), &obs, Local::now()).unwrap()
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let snapshot = sample_snapshot();

        save_snapshot(dir.path(), &snapshot).unwrap();

        match load_snapshot(dir.path(), "bitcoin") {
            PriorSnapshot::Present(loaded) => assert_eq!(loaded, snapshot),
            other => panic!("expected Present, got {:?}", other),
        }
    }

    #[test]
    fn test_saved_snapshot_is_compact() {
        let dir = tempdir().unwrap();
        save_snapshot(dir.path(), &sample_snapshot()).unwrap();

        let raw = fs::read_to_string(snapshot_path(dir.path(), "bitcoin")).unwrap();
        assert!(!raw.contains('\n'));
        assert!(raw.contains("\"prices\":[["));
    }

    #[test]
    fn test_load_missing_is_absent() {
        let dir = tempdir().unwrap();
        assert_eq!(load_snapshot(dir.path(), "bitcoin"), PriorSnapshot::Absent);
    }

    #[test]
    fn test_load_truncated_is_corrupt() {
        let dir = tempdir().unwrap();
        fs::write(snapshot_path(dir.path(), "bitcoin"), r#"{"symbol":"BTC-USD","prices":[[14109"#).unwrap();

        assert!(matches!(load_snapshot(dir.path(), "bitcoin"), PriorSnapshot::Corrupt(_)));
    }

    #[test]
    fn test_load_misaligned_is_corrupt() {
        let dir = tempdir().unwrap();
        let mut snapshot = sample_snapshot();
        snapshot.total_volumes.pop();
        save_snapshot(dir.path(), &snapshot).unwrap();

        assert!(matches!(load_snapshot(dir.path(), "bitcoin"), PriorSnapshot::Corrupt(_)));
    }

    #[test]
    fn test_index_round_trip() {
        let dir = tempdir().unwrap();
        assert_eq!(load_index(dir.path()).unwrap(), None);

        let index = SnapshotIndex::new(vec!["bitcoin".to_string()], Local::now());
        save_index(dir.path(), &index).unwrap();

        assert_eq!(load_index(dir.path()).unwrap(), Some(index));
        let raw = fs::read_to_string(index_path(dir.path())).unwrap();
        assert!(raw.contains("\n  \"total_tokens\": 1"));
    }

    #[test]
    fn test_ensure_data_dir_nested() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("public").join("data");
        ensure_data_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
