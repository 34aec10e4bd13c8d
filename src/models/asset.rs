//! Asset table model
//!
//! The ordered list of `{symbol, id}` pairs the updater walks. Comes either
//! from the built-in table in `constants` or from a JSON file passed with
//! `--assets`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::constants::{DEFAULT_ASSETS, QUOTE_SUFFIX};
use crate::error::{AppError, Result};

/// One tracked asset: exchange ticker plus the slug used as its file key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub symbol: String,
    pub id: String,
}

impl AssetEntry {
    pub fn new(symbol: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            id: id.into(),
        }
    }

    /// Display name ("BTC-USD" -> "BTC")
    pub fn display_name(&self) -> String {
        self.symbol.replace(QUOTE_SUFFIX, "")
    }
}

/// Ordered asset table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTable {
    entries: Vec<AssetEntry>,
}

impl AssetTable {
    /// Build a table, rejecting empty fields and duplicate symbols or ids
    pub fn new(entries: Vec<AssetEntry>) -> Result<Self> {
        let mut symbols = HashSet::new();
        let mut ids = HashSet::new();

        for entry in &entries {
            if entry.symbol.trim().is_empty() || entry.id.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "Asset entry has an empty symbol or id: {:?}",
                    entry
                )));
            }
            if !symbols.insert(entry.symbol.as_str()) {
                return Err(AppError::Config(format!("Duplicate symbol: {}", entry.symbol)));
            }
            if !ids.insert(entry.id.as_str()) {
                return Err(AppError::Config(format!("Duplicate crypto id: {}", entry.id)));
            }
        }

        Ok(Self { entries })
    }

    /// The built-in table of 26 assets
    pub fn builtin() -> Self {
        Self {
            entries: DEFAULT_ASSETS
                .iter()
                .map(|(symbol, id)| AssetEntry::new(*symbol, *id))
                .collect(),
        }
    }

    /// Load a table from a JSON file containing `[{"symbol": .., "id": ..}, ..]`
    pub fn load<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let file_path = file_path.as_ref();
        let contents = fs::read_to_string(file_path).map_err(|e| {
            AppError::Config(format!("Failed to read {}: {}", file_path.display(), e))
        })?;
        let entries: Vec<AssetEntry> = serde_json::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse {}: {}", file_path.display(), e))
        })?;

        Self::new(entries)
    }

    /// Keep only the given symbols (case-insensitive), preserving table order
    pub fn restrict_to(self, symbols: &[String]) -> Result<Self> {
        if symbols.is_empty() {
            return Ok(self);
        }

        let wanted: Vec<String> = symbols.iter().map(|s| s.to_uppercase()).collect();
        for symbol in &wanted {
            if !self.entries.iter().any(|e| e.symbol.to_uppercase() == *symbol) {
                return Err(AppError::NotFound(format!("Symbol not in asset table: {}", symbol)));
            }
        }

        let entries = self
            .entries
            .into_iter()
            .filter(|e| wanted.contains(&e.symbol.to_uppercase()))
            .collect();

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[AssetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_table() {
        let table = AssetTable::builtin();
        assert_eq!(table.len(), 26);
        assert_eq!(table.entries()[0], AssetEntry::new("BTC-USD", "bitcoin"));
        assert!(table.entries().contains(&AssetEntry::new("BCH-USD", "bitcoin-cash")));
        // builtin must pass its own validation
        assert!(AssetTable::new(table.entries().to_vec()).is_ok());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(AssetEntry::new("SHIB-USD", "shiba-inu").display_name(), "SHIB");
        assert_eq!(AssetEntry::new("PAXG", "pax-gold").display_name(), "PAXG");
    }

    #[test]
    fn test_rejects_duplicates() {
        let dup_symbol = vec![
            AssetEntry::new("BTC-USD", "bitcoin"),
            AssetEntry::new("BTC-USD", "bitcoin-2"),
        ];
        assert!(matches!(AssetTable::new(dup_symbol), Err(AppError::Config(_))));

        let dup_id = vec![
            AssetEntry::new("BTC-USD", "bitcoin"),
            AssetEntry::new("WBTC-USD", "bitcoin"),
        ];
        assert!(matches!(AssetTable::new(dup_id), Err(AppError::Config(_))));

        let empty = vec![AssetEntry::new("", "bitcoin")];
        assert!(AssetTable::new(empty).is_err());
    }

    #[test]
    fn test_restrict_to() {
        let table = AssetTable::builtin()
            .restrict_to(&["eth-usd".to_string(), "BTC-USD".to_string()])
            .unwrap();
        let ids: Vec<&str> = table.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "ethereum"]);

        let missing = AssetTable::builtin().restrict_to(&["NOPE-USD".to_string()]);
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assets.json");
        fs::write(
            &path,
            r#"[{"symbol": "BTC-USD", "id": "bitcoin"}, {"symbol": "KAS-USD", "id": "kaspa"}]"#,
        )
        .unwrap();

        let table = AssetTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[1], AssetEntry::new("KAS-USD", "kaspa"));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(AssetTable::load(&path), Err(AppError::Config(_))));
    }
}
