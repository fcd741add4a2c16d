//! Synthetic in-memory backend and fixture builders used by this crate's own
//! test suite.
//!
//! A public, non-`cfg(test)` module reused by the `tests/*.rs` integration
//! suite: fixture construction centralized once instead of duplicated
//! across scenario tests.

use hashbrown::{HashMap, HashSet};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::accumulator::{NodeInfoAccumulator, NodeRecord};
use crate::backend::Backend;
use crate::edge::{EdgeRecord, EdgeTable};
use crate::graph::SampledGraph;

/// The node-info accumulator for [`SyntheticBackend`]: a plain concatenation
/// of node rows, which is about as far from associative-and-commutative as
/// a monoid-style fold gets while still trivially satisfying the contract.
#[derive(Clone, Debug, Default)]
pub struct SyntheticAccumulator {
    pending: Vec<NodeRecord<u32, ()>>,
}

impl NodeInfoAccumulator for SyntheticAccumulator {
    type Id = u32;
    type Meta = ();

    fn update(self, partial: Self) -> Self {
        let mut pending = self.pending;
        pending.extend(partial.pending);
        SyntheticAccumulator { pending }
    }

    fn nodes(&self) -> Vec<NodeRecord<u32, ()>> {
        self.pending.clone()
    }
}

/// A small in-memory backend over a fixed adjacency list, for exercising the
/// driver without any real I/O. `unreachable` simulates a backend that, for
/// specific seed/frontier nodes, swallows a transient failure into an empty
/// response.
pub struct SyntheticBackend {
    adjacency: HashMap<u32, Vec<(u32, f64)>>,
    unreachable: HashSet<u32>,
}

impl SyntheticBackend {
    /// Builds a backend from an explicit edge list. `directed = false` adds
    /// the reverse edge for every pair automatically.
    pub fn from_edges(edges: &[(u32, u32, f64)], directed: bool) -> Self {
        let mut adjacency: HashMap<u32, Vec<(u32, f64)>> = HashMap::new();
        for &(source, target, weight) in edges {
            adjacency.entry(source).or_default().push((target, weight));
            if !directed {
                adjacency.entry(target).or_default().push((source, weight));
            }
        }
        Self {
            adjacency,
            unreachable: HashSet::new(),
        }
    }

    /// Marks `nodes` as always returning an empty neighbor table, as if a
    /// transient backend error occurred on every request for them.
    pub fn with_unreachable(mut self, nodes: impl IntoIterator<Item = u32>) -> Self {
        self.unreachable.extend(nodes);
        self
    }

    /// A backend with no edges at all: always returns an empty graph with
    /// zero nodes and zero edges.
    pub fn empty() -> Self {
        Self {
            adjacency: HashMap::new(),
            unreachable: HashSet::new(),
        }
    }

    /// Generates a Barabasi-Albert preferential-attachment graph with `n`
    /// nodes, each new node attaching to `m` existing ones.
    pub fn barabasi_albert(n: usize, m: usize, seed: u64) -> Self {
        Self::from_edges(&barabasi_albert_edges(n, m, seed), false)
    }

    /// Generates a two-(or-more)-block stochastic block model.
    pub fn stochastic_block_model(block_sizes: &[usize], p_in: f64, p_out: f64, seed: u64) -> Self {
        Self::from_edges(&sbm_edges(block_sizes, p_in, p_out, seed), false)
    }
}

impl Backend for SyntheticBackend {
    type Id = u32;
    type Extra = ();
    type NodeMeta = ();
    type Accumulator = SyntheticAccumulator;

    fn create_node_info(&self) -> Self::Accumulator {
        SyntheticAccumulator::default()
    }

    fn get_neighbors(&mut self, node: &u32) -> (Self::Accumulator, EdgeTable<u32, ()>) {
        if self.unreachable.contains(node) {
            return (SyntheticAccumulator::default(), Vec::new());
        }
        let partial = SyntheticAccumulator {
            pending: vec![NodeRecord {
                id: *node,
                hop: 0,
                meta: (),
            }],
        };
        let table = self
            .adjacency
            .get(node)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|(target, weight)| EdgeRecord::new(*node, target, weight, ()))
            .collect();
        (partial, table)
    }

    fn filter(
        &self,
        partial: Self::Accumulator,
        edges: EdgeTable<u32, ()>,
    ) -> (Self::Accumulator, EdgeTable<u32, ()>) {
        (partial, edges)
    }

    fn add_graph_attributes(
        &self,
        graph: SampledGraph<u32, (), ()>,
        _nodes: &[NodeRecord<u32, ()>],
        _edges: &EdgeTable<u32, ()>,
        _accumulator: &Self::Accumulator,
    ) -> SampledGraph<u32, (), ()> {
        graph
    }
}

fn barabasi_albert_edges(n: usize, m: usize, seed: u64) -> Vec<(u32, u32, f64)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    if n <= m {
        // Degenerate case: too few nodes for the requested attachment
        // degree, fall back to a complete graph on `n` nodes.
        for i in 0..n as u32 {
            for j in (i + 1)..n as u32 {
                edges.push((i, j, 1.0));
                edges.push((j, i, 1.0));
            }
        }
        return edges;
    }

    let mut repeated_nodes: Vec<u32> = (0..m as u32).collect();
    let mut existing: Vec<u32> = (0..m as u32).collect();

    for new_node in m..n {
        let new_node = new_node as u32;
        let mut targets: HashSet<u32> = HashSet::new();
        while targets.len() < m {
            let candidate = if repeated_nodes.is_empty() {
                existing[rng.gen_range(0..existing.len())]
            } else {
                repeated_nodes[rng.gen_range(0..repeated_nodes.len())]
            };
            targets.insert(candidate);
        }
        for &target in &targets {
            edges.push((new_node, target, 1.0));
            edges.push((target, new_node, 1.0));
            repeated_nodes.push(target);
            repeated_nodes.push(new_node);
        }
        existing.push(new_node);
    }
    edges
}

fn sbm_edges(block_sizes: &[usize], p_in: f64, p_out: f64, seed: u64) -> Vec<(u32, u32, f64)> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut block_of: Vec<usize> = Vec::new();
    for (block, &size) in block_sizes.iter().enumerate() {
        block_of.extend(std::iter::repeat(block).take(size));
    }
    let n = block_of.len();
    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let probability = if block_of[i] == block_of[j] { p_in } else { p_out };
            if rng.gen_range(0.0..1.0) < probability {
                edges.push((i as u32, j as u32, 1.0));
                edges.push((j as u32, i as u32, 1.0));
            }
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barabasi_albert_graph_is_reasonably_connected() {
        let backend = SyntheticBackend::barabasi_albert(200, 5, 1);
        // Every non-seed node should have accumulated at least `m` edges
        // across both attachment directions.
        for node in 5u32..200 {
            let neighbors = backend.adjacency.get(&node);
            assert!(neighbors.map(|n| !n.is_empty()).unwrap_or(false));
        }
    }

    #[test]
    fn empty_backend_has_no_adjacency() {
        let backend = SyntheticBackend::empty();
        assert!(backend.adjacency.is_empty());
    }
}
