use thiserror::Error;

use crate::graph::Asset;

/// Errors surfaced by graph construction, routing and cycle detection.
///
/// "No route" is not an error: the router reports it as an empty path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("pool #{pool} ({asset_a}/{asset_b}) has invalid rate {rate}: must be finite and > 0")]
    InvalidRate {
        pool: usize,
        asset_a: Asset,
        asset_b: Asset,
        rate: f64,
    },

    #[error("amount in must be finite and > 0, got {0}")]
    InvalidAmount(f64),

    #[error("no pool quotes {from} -> {to}")]
    UnknownPair { from: Asset, to: Asset },

    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),
}

pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors from the swap-output formulas
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AmmError {
    #[error("liquidity must be finite and > 0, got {0}")]
    InvalidLiquidity(f64),

    #[error("swap input must be finite and > 0, got {0}")]
    InvalidAmount(f64),

    #[error("next tick sqrt price {next} is on the wrong side of current {current} for this swap direction")]
    WrongTickSide { current: f64, next: f64 },
}
