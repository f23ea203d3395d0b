use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque asset identifier (token symbol or address)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Asset(String);

impl Asset {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Asset {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Asset {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Which way a swap crosses a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// asset_a -> asset_b at `rate`
    Forward,
    /// asset_b -> asset_a at `1 / rate`
    Reverse,
}

/// Constant-product reserves, used only by slippage-aware quoters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reserves {
    pub reserve_a: f64,
    pub reserve_b: f64,
    /// Swap fee in basis points (30 = 0.30%)
    #[serde(default)]
    pub fee_bps: u32,
}

/// Exchange relationship between two assets.
///
/// `rate` is the amount of `asset_b` obtained per unit of `asset_a`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub asset_a: Asset,
    pub asset_b: Asset,
    pub rate: f64,
    /// One-way pools only quote asset_a -> asset_b
    #[serde(default = "default_bidirectional")]
    pub bidirectional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserves: Option<Reserves>,
}

fn default_bidirectional() -> bool {
    true
}

impl Pool {
    pub fn new(asset_a: impl Into<Asset>, asset_b: impl Into<Asset>, rate: f64) -> Self {
        Self {
            asset_a: asset_a.into(),
            asset_b: asset_b.into(),
            rate,
            bidirectional: true,
            reserves: None,
        }
    }

    /// A directed quote: only asset_a -> asset_b is tradable
    pub fn one_way(asset_a: impl Into<Asset>, asset_b: impl Into<Asset>, rate: f64) -> Self {
        Self {
            bidirectional: false,
            ..Self::new(asset_a, asset_b, rate)
        }
    }

    pub fn with_reserves(mut self, reserves: Reserves) -> Self {
        self.reserves = Some(reserves);
        self
    }

    pub fn is_rate_valid(&self) -> bool {
        self.rate > 0.0 && self.rate.is_finite()
    }

    /// Real (non-log) rate for a swap in the given direction
    pub fn rate_towards(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Forward => self.rate,
            Direction::Reverse => 1.0 / self.rate,
        }
    }

    /// (input asset, output asset) for a swap in the given direction
    pub fn endpoints(&self, direction: Direction) -> (&Asset, &Asset) {
        match direction {
            Direction::Forward => (&self.asset_a, &self.asset_b),
            Direction::Reverse => (&self.asset_b, &self.asset_a),
        }
    }
}

/// Edge data for one directed swap through a pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeData {
    /// Index of the originating pool in the input slice
    pub pool: usize,
    pub direction: Direction,
    pub rate: f64,
    pub weight: f64, // -ln(rate) for Bellman-Ford
}

impl EdgeData {
    pub fn new(pool: usize, direction: Direction, rate: f64, weight: f64) -> Self {
        Self {
            pool,
            direction,
            rate,
            weight,
        }
    }
}
