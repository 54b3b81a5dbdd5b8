//! Configuration file loading

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read and deserialize a JSON file
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        max_peers: usize,
    }

    #[test]
    fn test_load_json() {
        let path = std::env::temp_dir().join(format!("competitor-utils-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"max_peers": 3}"#).unwrap();

        let sample: Sample = load_json(&path).unwrap();
        assert_eq!(sample, Sample { max_peers: 3 });
        std::fs::remove_file(&path).unwrap();

        let missing = load_json::<Sample>(&path).unwrap_err();
        assert!(missing.to_string().starts_with("Failed to read"));
    }
}
