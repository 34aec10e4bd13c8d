use std::path::PathBuf;

use crate::error::Result;
use crate::models::{AssetTable, PriorSnapshot};
use crate::services::snapshot_store::{load_index, load_snapshot};
use crate::utils::{format_number, get_data_dir};

pub fn run(data_dir: Option<PathBuf>, assets_file: Option<PathBuf>) {
    let data_dir = data_dir.unwrap_or_else(get_data_dir);
    println!("📊 Snapshot Status ({})\n", data_dir.display());

    let table = match assets_file {
        Some(path) => AssetTable::load(path),
        None => Ok(AssetTable::builtin()),
    };

    if let Err(e) = table.and_then(|table| show_status(&data_dir, &table)) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn show_status(data_dir: &std::path::Path, table: &AssetTable) -> Result<()> {
    let index = match load_index(data_dir)? {
        Some(index) => index,
        None => {
            println!("⚠️  No index.json found. Run 'update' first.");
            return Ok(());
        }
    };

    println!("🕒 Last run:  {}", index.last_updated);
    println!("📈 Available: {} tokens ({})\n", index.total_tokens, index.data_source);

    for id in &index.available_tokens {
        match load_snapshot(data_dir, id) {
            PriorSnapshot::Present(snapshot) => {
                println!(
                    "🔹 {:<18} {:>8} records  ({} → {})  last close {:.2}",
                    id,
                    format_number(snapshot.data_points),
                    date_part(&snapshot.earliest_date),
                    date_part(&snapshot.latest_date),
                    snapshot.prices.last().map(|p| p.value()).unwrap_or_default()
                );
            }
            PriorSnapshot::Absent => println!("⚠️  {:<18} listed in index but file missing", id),
            PriorSnapshot::Corrupt(reason) => println!("⚠️  {:<18} unreadable: {}", id, reason),
        }
    }

    let missing: Vec<&str> = table
        .entries()
        .iter()
        .filter(|e| !index.available_tokens.contains(&e.id))
        .map(|e| e.symbol.as_str())
        .collect();
    if !missing.is_empty() {
        println!("\n❌ Not in last run: {}", missing.join(", "));
    }

    Ok(())
}

/// "2014-09-17T00:00:00+00:00" -> "2014-09-17"
fn date_part(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or(timestamp)
}
