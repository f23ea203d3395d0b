pub mod arbitrage;
pub mod bellman_ford;
pub mod builder;
pub mod router;
pub mod types;

// Re-exports for external use
pub use arbitrage::{detect_arbitrage, find_arbitrage_cycle, ArbitrageCycle, ArbitrageDetector};
pub use bellman_ford::{OnRelax, Relaxation, Relaxer, RoundOutcome, Seed, StopReason};
pub use builder::RateGraph;
pub use router::{find_best_path, quote_path, Router, SwapRoute};
pub use types::{Asset, Direction, EdgeData, Pool, Reserves};
