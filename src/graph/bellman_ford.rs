//! Bellman-Ford Relaxation Engine
//!
//! One engine serves both consumers:
//! - the router seeds a single source and records every relaxation
//! - the arbitrage detector seeds every node at zero, converges, then probes
//!   one extra round and halts on the first edge that still relaxes
//!
//! A relaxation is accepted only if it improves the target distance by more
//! than `eps`, which keeps `-ln`/`exp` rounding noise from posing as a cycle.

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{debug, trace};

use super::builder::RateGraph;

/// Initial distance assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seed {
    /// Source at 0, every other node at +inf (shortest path)
    Source(NodeIndex),
    /// Every node at 0 (any-cycle detection)
    Everywhere,
}

/// What a round does with a relaxable edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnRelax {
    /// Apply it and keep going
    Record,
    /// Leave distances untouched and stop the round immediately
    Halt,
}

/// One edge that improved (or would improve) its target's distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relaxation {
    pub edge: EdgeIndex,
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopReason {
    /// A full round relaxed nothing
    Converged,
    /// `OnRelax::Halt` hit a relaxable edge
    Relaxable(Relaxation),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundOutcome {
    Continue,
    Stop(StopReason),
}

/// Query-scoped relaxation state over a borrowed graph
pub struct Relaxer<'g> {
    graph: &'g RateGraph,
    distances: Vec<f64>,
    predecessors: Option<Vec<Option<EdgeIndex>>>,
    eps: f64,
    rounds: usize,
    relaxations: usize,
}

impl<'g> Relaxer<'g> {
    pub fn new(graph: &'g RateGraph, seed: Seed, eps: f64) -> Self {
        let node_count = graph.node_count();
        let distances = match seed {
            Seed::Everywhere => vec![0.0; node_count],
            Seed::Source(source) => {
                let mut distances = vec![f64::INFINITY; node_count];
                if let Some(slot) = distances.get_mut(source.index()) {
                    *slot = 0.0;
                }
                distances
            }
        };

        Self {
            graph,
            distances,
            predecessors: None,
            eps,
            rounds: 0,
            relaxations: 0,
        }
    }

    /// Remember, for every relaxed node, the edge that last relaxed it
    pub fn with_predecessors(mut self) -> Self {
        self.predecessors = Some(vec![None; self.distances.len()]);
        self
    }

    /// One full pass over all edges in graph order
    pub fn round(&mut self, on_relax: OnRelax) -> RoundOutcome {
        let graph = self.graph;
        self.rounds += 1;
        let mut relaxed = 0usize;

        for edge in graph.graph.edge_references() {
            let (u, v) = (edge.source(), edge.target());
            let base = self.distances[u.index()];
            if base.is_infinite() {
                continue;
            }

            let candidate = base + edge.weight().weight;
            if candidate < self.distances[v.index()] - self.eps {
                let relaxation = Relaxation {
                    edge: edge.id(),
                    from: u,
                    to: v,
                    distance: candidate,
                };

                match on_relax {
                    OnRelax::Halt => {
                        trace!(
                            "Round {}: edge {} -> {} still relaxes ({:.3e} below)",
                            self.rounds,
                            graph.graph[u],
                            graph.graph[v],
                            self.distances[v.index()] - candidate
                        );
                        return RoundOutcome::Stop(StopReason::Relaxable(relaxation));
                    }
                    OnRelax::Record => {
                        self.accept(&relaxation);
                        relaxed += 1;
                    }
                }
            }
        }

        trace!("Round {}: {} relaxations", self.rounds, relaxed);

        if relaxed == 0 {
            RoundOutcome::Stop(StopReason::Converged)
        } else {
            RoundOutcome::Continue
        }
    }

    /// Up to `max_rounds` rounds; returns early on the first stop
    pub fn run(&mut self, max_rounds: usize, on_relax: OnRelax) -> RoundOutcome {
        for _ in 0..max_rounds {
            if let RoundOutcome::Stop(reason) = self.round(on_relax) {
                debug!(
                    "Relaxation stopped after {} rounds ({} relaxations): {:?}",
                    self.rounds, self.relaxations, reason
                );
                return RoundOutcome::Stop(reason);
            }
        }

        debug!(
            "Relaxation ran all {} rounds ({} relaxations)",
            self.rounds, self.relaxations
        );
        RoundOutcome::Continue
    }

    /// Apply a relaxation (used internally and to commit a halted probe)
    pub fn accept(&mut self, relaxation: &Relaxation) {
        self.distances[relaxation.to.index()] = relaxation.distance;
        if let Some(predecessors) = self.predecessors.as_mut() {
            predecessors[relaxation.to.index()] = Some(relaxation.edge);
        }
        self.relaxations += 1;
        trace!(
            "Relaxed {} -> {} to {:.12}",
            self.graph.graph[relaxation.from],
            self.graph.graph[relaxation.to],
            relaxation.distance
        );
    }

    pub fn distance(&self, node: NodeIndex) -> f64 {
        self.distances
            .get(node.index())
            .copied()
            .unwrap_or(f64::INFINITY)
    }

    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Edge that last relaxed `node`; always `None` without predecessor tracking
    pub fn predecessor(&self, node: NodeIndex) -> Option<EdgeIndex> {
        self.predecessors
            .as_ref()
            .and_then(|p| p.get(node.index()).copied().flatten())
    }

    pub fn graph(&self) -> &'g RateGraph {
        self.graph
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn relaxations(&self) -> usize {
        self.relaxations
    }
}
