//! Pool snapshot files
//!
//! ```json
//! { "pools": [ { "asset_a": "ETH", "asset_b": "USDC", "rate": 2000.0 } ],
//!   "assets": ["ETH", "USDC"] }
//! ```

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::graph::{Asset, Pool};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub pools: Vec<Pool>,
    /// Asset universe; derived from the pools when omitted
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl PoolSnapshot {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let body = fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("Failed to read snapshot {}: {}", path.display(), e))?;
        let snapshot = Self::parse(&body)
            .map_err(|e| eyre::eyre!("Failed to parse snapshot {}: {}", path.display(), e))?;

        debug!(
            "Loaded {} pools and {} listed assets from {}",
            snapshot.pools.len(),
            snapshot.assets.len(),
            path.display()
        );
        Ok(snapshot)
    }

    pub fn parse(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Declared universe, or every pool asset in first-seen order
    pub fn universe(&self) -> Vec<Asset> {
        if !self.assets.is_empty() {
            return self.assets.clone();
        }

        let mut seen = HashSet::new();
        self.pools
            .iter()
            .flat_map(|p| [&p.asset_a, &p.asset_b])
            .filter(|a| seen.insert(*a))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_defaults() {
        let snapshot = PoolSnapshot::parse(
            r#"{
                "pools": [
                    { "asset_a": "ETH", "asset_b": "USDC", "rate": 2000.0 },
                    { "asset_a": "USD", "asset_b": "EUR", "rate": 0.9, "bidirectional": false },
                    { "asset_a": "ETH", "asset_b": "DAI", "rate": 1990.0,
                      "reserves": { "reserve_a": 10.0, "reserve_b": 19900.0, "fee_bps": 30 } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.pools.len(), 3);
        assert!(snapshot.pools[0].bidirectional);
        assert!(!snapshot.pools[1].bidirectional);
        assert_eq!(snapshot.pools[2].reserves.unwrap().fee_bps, 30);
        assert!(snapshot.assets.is_empty());

        let universe = snapshot.universe();
        let names: Vec<&str> = universe.iter().map(|a| a.as_str()).collect();
        assert_eq!(names, vec!["ETH", "USDC", "USD", "EUR", "DAI"]);
    }

    #[test]
    fn test_declared_universe_wins() {
        let snapshot = PoolSnapshot::parse(
            r#"{ "pools": [ { "asset_a": "ETH", "asset_b": "USDC", "rate": 2000.0 } ],
                 "assets": ["ETH", "USDC", "DOGE"] }"#,
        )
        .unwrap();
        assert_eq!(
            snapshot.universe(),
            vec![Asset::from("ETH"), Asset::from("USDC"), Asset::from("DOGE")]
        );
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(PoolSnapshot::parse(r#"{ "pools": [ { "asset_a": "ETH" } ] }"#).is_err());
        assert!(PoolSnapshot::load("/nonexistent/pools.json").is_err());
    }
}
