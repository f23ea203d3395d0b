//! Arbitrage Detection
//!
//! Every node starts at distance 0, so a single run explores all cycles at
//! once. After |V|-1 rounds one more probe round halts on the first edge
//! that still relaxes: that edge sits on (or behind) a negative cycle.

use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use super::bellman_ford::{OnRelax, Relaxation, Relaxer, RoundOutcome, Seed, StopReason};
use super::builder::RateGraph;
use super::types::{Asset, Pool};
use crate::config::EngineConfig;
use crate::error::{GraphError, Result};

/// A profitable closed walk recovered from the predecessor table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageCycle {
    /// Closed asset path, first == last
    pub path: Vec<Asset>,
    /// Input index of the pool behind each hop
    pub pools: Vec<usize>,
    /// Real rate of each hop in path order
    pub rates: Vec<f64>,
    /// Product of `rates`
    pub compounded_rate: f64,
}

impl ArbitrageCycle {
    /// Calculate profit percentage
    pub fn profit_percentage(&self) -> f64 {
        (self.compounded_rate - 1.0) * 100.0
    }

    /// Get the number of hops in the cycle
    pub fn hop_count(&self) -> usize {
        self.rates.len()
    }

    /// Get a formatted string of the cycle
    pub fn token_path(&self) -> String {
        self.path
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArbitrageDetector {
    config: EngineConfig,
}

impl ArbitrageDetector {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Whether any cycle in `pools` compounds above 1 (beyond tolerance).
    ///
    /// `assets` is the universe the caller expects to participate: only
    /// pools with both sides listed are searched. An empty universe means
    /// every pool. Listed assets absent from every pool are skipped.
    pub fn detect(&self, pools: &[Pool], assets: &[Asset]) -> Result<bool> {
        let full = RateGraph::from_pools(pools)?;

        let missing = assets.iter().filter(|a| full.get_node(a).is_none()).count();
        if missing > 0 {
            debug!("{} of {} listed assets are in no pool", missing, assets.len());
        }

        let graph = if assets.is_empty() {
            full
        } else {
            let universe: HashSet<&Asset> = assets.iter().collect();
            let listed: Vec<Pool> = pools
                .iter()
                .filter(|p| universe.contains(&p.asset_a) && universe.contains(&p.asset_b))
                .cloned()
                .collect();
            if listed.len() < pools.len() {
                debug!(
                    "{} of {} pools touch assets outside the universe",
                    pools.len() - listed.len(),
                    pools.len()
                );
            }
            RateGraph::from_pools(&listed)?
        };

        let mut relaxer = Relaxer::new(&graph, Seed::Everywhere, self.config.eps);
        let found = probe(&mut relaxer).is_some();

        debug!(
            "Arbitrage check over {} nodes / {} edges: {}",
            graph.node_count(),
            graph.edge_count(),
            if found { "cycle found" } else { "none" }
        );
        Ok(found)
    }

    /// Recover one profitable cycle, if any
    pub fn find_cycle(&self, pools: &[Pool]) -> Result<Option<ArbitrageCycle>> {
        let graph = RateGraph::from_pools(pools)?;
        let mut relaxer =
            Relaxer::new(&graph, Seed::Everywhere, self.config.eps).with_predecessors();

        let Some(hit) = probe(&mut relaxer) else {
            return Ok(None);
        };
        relaxer.accept(&hit);

        // |V| steps back from a node relaxed in the probe round lands on the cycle
        let mut current = hit.to;
        for _ in 0..graph.node_count() {
            match step_back(&relaxer, current)? {
                Some((prev, _)) => current = prev,
                None => {
                    warn!(
                        "Predecessor chain behind {} broke before reaching a cycle",
                        graph.graph[hit.to]
                    );
                    return Ok(None);
                }
            }
        }

        let start = current;
        let mut edges: Vec<EdgeIndex> = Vec::new();
        loop {
            let Some((prev, edge)) = step_back(&relaxer, current)? else {
                warn!("Cycle through {} lost a predecessor", graph.graph[start]);
                return Ok(None);
            };
            edges.push(edge);
            current = prev;

            if current == start {
                break;
            }
            if edges.len() > graph.node_count() {
                return Err(GraphError::InternalInconsistency(format!(
                    "predecessor cycle through {} exceeds {} hops",
                    graph.graph[start],
                    graph.node_count()
                )));
            }
        }
        edges.reverse();

        let cycle = collect_cycle(&graph, start, &edges)?;
        debug!(
            "Arbitrage cycle {} | {} hops | x{:.6} ({:+.4}%)",
            cycle.token_path(),
            cycle.hop_count(),
            cycle.compounded_rate,
            cycle.profit_percentage()
        );
        Ok(Some(cycle))
    }
}

/// |V|-1 recording rounds, then one halting probe round.
/// Returns the edge that still relaxes, if any.
fn probe(relaxer: &mut Relaxer<'_>) -> Option<Relaxation> {
    let steps = relaxer.graph().relaxation_steps();
    if let RoundOutcome::Stop(StopReason::Converged) = relaxer.run(steps, OnRelax::Record) {
        return None;
    }

    match relaxer.round(OnRelax::Halt) {
        RoundOutcome::Stop(StopReason::Relaxable(relaxation)) => Some(relaxation),
        _ => None,
    }
}

fn step_back(relaxer: &Relaxer<'_>, node: NodeIndex) -> Result<Option<(NodeIndex, EdgeIndex)>> {
    let Some(edge) = relaxer.predecessor(node) else {
        return Ok(None);
    };
    let (prev, _, _) = relaxer.graph().edge(edge).ok_or_else(|| {
        GraphError::InternalInconsistency(format!("predecessor edge {:?} not in graph", edge))
    })?;
    Ok(Some((prev, edge)))
}

fn collect_cycle(graph: &RateGraph, start: NodeIndex, edges: &[EdgeIndex]) -> Result<ArbitrageCycle> {
    let mut path = vec![graph.graph[start].clone()];
    let mut pools = Vec::with_capacity(edges.len());
    let mut rates = Vec::with_capacity(edges.len());

    for &edge in edges {
        let (_, next, data) = graph.edge(edge).ok_or_else(|| {
            GraphError::InternalInconsistency(format!("cycle edge {:?} not in graph", edge))
        })?;
        path.push(graph.graph[next].clone());
        pools.push(data.pool);
        rates.push(data.rate);
    }

    let compounded_rate = rates.iter().product();
    Ok(ArbitrageCycle {
        path,
        pools,
        rates,
        compounded_rate,
    })
}

/// Whether `pools` contain an arbitrage cycle at tolerance `eps`
pub fn detect_arbitrage(pools: &[Pool], assets: &[Asset], eps: f64) -> Result<bool> {
    ArbitrageDetector::new(EngineConfig::new(eps)).detect(pools, assets)
}

/// One arbitrage cycle in `pools` at tolerance `eps`, if any
pub fn find_arbitrage_cycle(pools: &[Pool], eps: f64) -> Result<Option<ArbitrageCycle>> {
    ArbitrageDetector::new(EngineConfig::new(eps)).find_cycle(pools)
}
