use std::path::PathBuf;

use crate::constants::DEFAULT_DATA_DIR;

/// Get snapshot data directory from environment variable or use default
pub fn get_data_dir() -> PathBuf {
    std::env::var("CRYPTOSNAP_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR))
}

/// Format a count with thousands separators (1234567 -> "1,234,567")
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(4018), "4,018");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
