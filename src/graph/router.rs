//! Best Swap Path
//!
//! Shortest path in -ln(rate) space picks the route; the output amount is
//! then computed by folding real per-hop rates over that route, never by
//! exponentiating the log distance.

use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::bellman_ford::{OnRelax, Relaxer, Seed};
use super::builder::RateGraph;
use super::types::{Asset, Pool};
use crate::amm::{FlatRate, SwapQuoter};
use crate::config::EngineConfig;
use crate::error::{GraphError, Result};

/// A priced route. An empty `path` means there is nothing to swap or no route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwapRoute {
    pub path: Vec<Asset>,
    /// Input index of the pool used for each hop
    pub pools: Vec<usize>,
    pub amount_out: f64,
}

impl SwapRoute {
    /// `{ path: [], amount_out: 0 }`
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Get the number of hops in the route
    pub fn hop_count(&self) -> usize {
        self.pools.len()
    }

    /// Get a formatted string of the asset path
    pub fn token_path(&self) -> String {
        self.path
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// Single-source best-path router
#[derive(Debug, Clone, Copy, Default)]
pub struct Router {
    config: EngineConfig,
}

impl Router {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn eps(&self) -> f64 {
        self.config.eps
    }

    /// Best route `from -> to` priced at the pools' flat rates.
    ///
    /// Fails with `InternalInconsistency` when an arbitrage cycle captures
    /// the destination's predecessor chain; run `detect_arbitrage` first on
    /// pool sets that may contain one.
    pub fn find_best_path(
        &self,
        pools: &[Pool],
        from: &Asset,
        to: &Asset,
        amount_in: f64,
    ) -> Result<SwapRoute> {
        self.find_best_path_with(pools, from, to, amount_in, &FlatRate)
    }

    /// Best route `from -> to`, priced hop by hop with `quoter`.
    /// The route itself is always chosen on quoted rates.
    pub fn find_best_path_with<Q: SwapQuoter + ?Sized>(
        &self,
        pools: &[Pool],
        from: &Asset,
        to: &Asset,
        amount_in: f64,
        quoter: &Q,
    ) -> Result<SwapRoute> {
        if from == to {
            debug!("Same-asset route {} -> {}: nothing to swap", from, to);
            return Ok(SwapRoute::empty());
        }
        validate_amount(amount_in)?;

        let graph = RateGraph::from_pools(pools)?;

        let (Some(source), Some(target)) = (graph.get_node(from), graph.get_node(to)) else {
            debug!("No route {} -> {}: asset not in any pool", from, to);
            return Ok(SwapRoute::empty());
        };

        let mut relaxer =
            Relaxer::new(&graph, Seed::Source(source), self.config.eps).with_predecessors();
        relaxer.run(graph.relaxation_steps(), OnRelax::Record);

        if relaxer.distance(target).is_infinite() {
            debug!("No route {} -> {}: unreachable", from, to);
            return Ok(SwapRoute::empty());
        }

        let Some(hops) = reconstruct_path(&relaxer, source, target)? else {
            return Ok(SwapRoute::empty());
        };

        let mut path = Vec::with_capacity(hops.len() + 1);
        let mut pool_ids = Vec::with_capacity(hops.len());
        let mut amount_out = amount_in;
        path.push(from.clone());

        for &edge in &hops {
            let (_, next, data) = graph.edge(edge).ok_or_else(|| {
                GraphError::InternalInconsistency(format!("predecessor edge {:?} not in graph", edge))
            })?;
            let pool = graph.pool(data.pool).ok_or_else(|| {
                GraphError::InternalInconsistency(format!("edge references missing pool #{}", data.pool))
            })?;

            amount_out = quoter.quote_swap(pool, data.direction, amount_out);
            path.push(graph.graph[next].clone());
            pool_ids.push(data.pool);
        }

        let route = SwapRoute {
            path,
            pools: pool_ids,
            amount_out,
        };
        debug!(
            "Best route {} | {} hops | {} in -> {} out",
            route.token_path(),
            route.hop_count(),
            amount_in,
            route.amount_out
        );

        Ok(route)
    }

    /// Price a caller-chosen path through the pair index
    pub fn quote_path(&self, pools: &[Pool], path: &[Asset], amount_in: f64) -> Result<SwapRoute> {
        self.quote_path_with(pools, path, amount_in, &FlatRate)
    }

    pub fn quote_path_with<Q: SwapQuoter + ?Sized>(
        &self,
        pools: &[Pool],
        path: &[Asset],
        amount_in: f64,
        quoter: &Q,
    ) -> Result<SwapRoute> {
        validate_amount(amount_in)?;
        let graph = RateGraph::from_pools(pools)?;

        if path.len() < 2 {
            return Ok(SwapRoute::empty());
        }

        let mut pool_ids = Vec::with_capacity(path.len() - 1);
        let mut amount_out = amount_in;

        for pair in path.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let (index, direction) = graph.hop(from, to).ok_or_else(|| GraphError::UnknownPair {
                from: from.clone(),
                to: to.clone(),
            })?;
            amount_out = quoter.quote_swap(&graph.pools()[index], direction, amount_out);
            pool_ids.push(index);
        }

        Ok(SwapRoute {
            path: path.to_vec(),
            pools: pool_ids,
            amount_out,
        })
    }
}

fn validate_amount(amount_in: f64) -> Result<()> {
    if amount_in > 0.0 && amount_in.is_finite() {
        Ok(())
    } else {
        Err(GraphError::InvalidAmount(amount_in))
    }
}

/// Walk predecessors from `target` back to `source`.
///
/// `Ok(None)` when a node on the way has no predecessor (unreachable);
/// an error when the walk outgrows the node count, which means the chain
/// has closed on itself.
fn reconstruct_path(
    relaxer: &Relaxer<'_>,
    source: NodeIndex,
    target: NodeIndex,
) -> Result<Option<Vec<EdgeIndex>>> {
    let graph = relaxer.graph();
    let limit = graph.node_count();
    let mut hops = Vec::new();
    let mut current = target;

    while current != source {
        let Some(edge) = relaxer.predecessor(current) else {
            warn!(
                "Predecessor chain for {} broke at {}",
                graph.graph[target], graph.graph[current]
            );
            return Ok(None);
        };

        hops.push(edge);
        if hops.len() > limit {
            warn!(
                "Predecessor chain for {} exceeds {} hops",
                graph.graph[target], limit
            );
            return Err(GraphError::InternalInconsistency(format!(
                "predecessor chain from {} does not reach {} within {} hops",
                graph.graph[target], graph.graph[source], limit
            )));
        }

        current = graph
            .edge(edge)
            .map(|(prev, _, _)| prev)
            .ok_or_else(|| {
                GraphError::InternalInconsistency(format!("predecessor edge {:?} not in graph", edge))
            })?;
    }

    hops.reverse();
    Ok(Some(hops))
}

/// Best route with the default tolerance and flat-rate pricing
pub fn find_best_path(pools: &[Pool], from: &Asset, to: &Asset, amount_in: f64) -> Result<SwapRoute> {
    Router::default().find_best_path(pools, from, to, amount_in)
}

/// Price a caller-chosen path with flat rates
pub fn quote_path(pools: &[Pool], path: &[Asset], amount_in: f64) -> Result<SwapRoute> {
    Router::default().quote_path(pools, path, amount_in)
}
