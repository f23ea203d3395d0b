//! Best-path routing and arbitrage detection over pool exchange rates.
//!
//! Rates become `-ln(rate)` edge weights; one Bellman-Ford engine then
//! serves both the router (shortest path from a source) and the arbitrage
//! detector (negative cycle anywhere).

pub mod amm;
pub mod config;
pub mod display;
pub mod error;
pub mod graph;
pub mod quote;
pub mod snapshot;

pub use amm::{ConstantProduct, FlatRate, SwapQuoter};
pub use config::{EngineConfig, DEFAULT_EPS};
pub use error::{AmmError, GraphError, Result};
pub use graph::{
    detect_arbitrage, find_arbitrage_cycle, find_best_path, quote_path, ArbitrageCycle,
    ArbitrageDetector, Asset, Direction, Pool, Reserves, Router, SwapRoute,
};
pub use quote::{best_safe_quote, Quote};
pub use snapshot::PoolSnapshot;
