use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use std::collections::HashMap;
use tracing::{debug, warn};

use super::types::{Asset, Direction, EdgeData, Pool};
use crate::error::{GraphError, Result};

/// Directed rate graph built from a snapshot of pools.
///
/// Node indices follow first-seen asset order and edge indices follow pool
/// order (forward edge, then reverse edge), so iterating the petgraph
/// storage visits everything in a fixed order across repeated builds.
#[derive(Debug, Clone)]
pub struct RateGraph {
    pub graph: DiGraph<Asset, EdgeData>,
    asset_to_node: HashMap<Asset, NodeIndex>,
    /// (asset_a, asset_b) as written in the input -> pool index.
    /// The reverse pair is deliberately not inserted.
    pool_index: HashMap<(Asset, Asset), usize>,
    pools: Vec<Pool>,
}

impl RateGraph {
    /// Build the graph, rejecting the whole snapshot if any pool has a
    /// non-positive or non-finite rate.
    pub fn from_pools(pools: &[Pool]) -> Result<Self> {
        if let Some((index, pool)) = pools.iter().enumerate().find(|(_, p)| !p.is_rate_valid()) {
            warn!(
                "Rejecting pool #{} {}/{} - invalid rate {}",
                index, pool.asset_a, pool.asset_b, pool.rate
            );
            return Err(GraphError::InvalidRate {
                pool: index,
                asset_a: pool.asset_a.clone(),
                asset_b: pool.asset_b.clone(),
                rate: pool.rate,
            });
        }

        let mut graph = Self {
            graph: DiGraph::with_capacity(pools.len() * 2, pools.len() * 2),
            asset_to_node: HashMap::with_capacity(pools.len() * 2),
            pool_index: HashMap::with_capacity(pools.len()),
            pools: pools.to_vec(),
        };

        for (index, pool) in pools.iter().enumerate() {
            graph.add_pool(index, pool);
        }

        debug!(
            "Graph built: {} nodes, {} edges from {} pools",
            graph.node_count(),
            graph.edge_count(),
            pools.len()
        );

        Ok(graph)
    }

    fn add_pool(&mut self, index: usize, pool: &Pool) {
        let node_a = self.get_or_create_node(&pool.asset_a);
        let node_b = self.get_or_create_node(&pool.asset_b);

        let weight = -pool.rate.ln();
        self.graph.add_edge(
            node_a,
            node_b,
            EdgeData::new(index, Direction::Forward, pool.rate, weight),
        );

        // Negating keeps weight_ab + weight_ba exactly zero
        if pool.bidirectional {
            self.graph.add_edge(
                node_b,
                node_a,
                EdgeData::new(index, Direction::Reverse, pool.rate_towards(Direction::Reverse), -weight),
            );
        }

        self.pool_index
            .insert((pool.asset_a.clone(), pool.asset_b.clone()), index);
    }

    fn get_or_create_node(&mut self, asset: &Asset) -> NodeIndex {
        if let Some(&node) = self.asset_to_node.get(asset) {
            return node;
        }

        let node = self.graph.add_node(asset.clone());
        self.asset_to_node.insert(asset.clone(), node);
        node
    }

    /// Get the node index for an asset
    pub fn get_node(&self, asset: &Asset) -> Option<NodeIndex> {
        self.asset_to_node.get(asset).copied()
    }

    /// Get the asset for a node index
    pub fn get_asset(&self, node: NodeIndex) -> Option<&Asset> {
        self.graph.node_weight(node)
    }

    /// Assets in first-seen order
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.graph.node_indices().map(move |n| &self.graph[n])
    }

    /// Source, target and data of an edge
    pub fn edge(&self, edge: EdgeIndex) -> Option<(NodeIndex, NodeIndex, &EdgeData)> {
        let (from, to) = self.graph.edge_endpoints(edge)?;
        Some((from, to, &self.graph[edge]))
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn pool(&self, index: usize) -> Option<&Pool> {
        self.pools.get(index)
    }

    /// Pool registered for the ordered pair exactly as it appeared in input
    pub fn pool_for_pair(&self, asset_a: &Asset, asset_b: &Asset) -> Option<(usize, &Pool)> {
        let index = *self
            .pool_index
            .get(&(asset_a.clone(), asset_b.clone()))?;
        Some((index, &self.pools[index]))
    }

    /// Pool and direction to trade `from -> to`: the forward pair entry if
    /// present, otherwise the reverse entry when that pool is bidirectional.
    pub fn hop(&self, from: &Asset, to: &Asset) -> Option<(usize, Direction)> {
        if let Some((index, _)) = self.pool_for_pair(from, to) {
            return Some((index, Direction::Forward));
        }
        match self.pool_for_pair(to, from) {
            Some((index, pool)) if pool.bidirectional => Some((index, Direction::Reverse)),
            _ => None,
        }
    }

    /// Bellman-Ford round bound: |nodes| - 1
    pub fn relaxation_steps(&self) -> usize {
        self.node_count().saturating_sub(1)
    }

    /// Get the number of nodes (assets) in the graph
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of edges (swap directions) in the graph
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
