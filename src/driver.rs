//! Spiky-Ball driver and the crate's single entry point, `explore`.
//!
//! A plain `while` loop driving a `Result`-returning algorithm, with
//! validation happening once up front rather than scattered across the loop
//! body.

use hashbrown::HashSet;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::accumulator::{NodeInfoAccumulator, NodeRecord};
use crate::backend::Backend;
use crate::config::Config;
use crate::edge::EdgeTable;
use crate::error::{Result, SpikyBallError};
use crate::graph::{self, SampledGraph, Undirected64};
use crate::policy;
use crate::selector;

/// The assembled result of a run: either a directed or undirected graph,
/// depending on `config.graph.as_undirected`.
pub enum ExploredGraph<Id, Meta, Extra> {
    Directed(SampledGraph<Id, Meta, Extra>),
    Undirected(Undirected64<Id, Meta, Extra>),
}

impl<Id, Meta, Extra> ExploredGraph<Id, Meta, Extra>
where
    Id: Clone + Eq + std::hash::Hash,
{
    pub fn number_of_nodes(&self) -> usize {
        match self {
            ExploredGraph::Directed(g) => g.number_of_nodes(),
            ExploredGraph::Undirected(g) => g.node_count(),
        }
    }

    pub fn number_of_edges(&self) -> usize {
        match self {
            ExploredGraph::Directed(g) => g.number_of_edges(),
            ExploredGraph::Undirected(g) => g.edge_count(),
        }
    }
}

/// De-duplicates `items` while preserving first-occurrence order. The
/// initial frontier is the seed list, deduplicated, order preserved.
fn dedup_preserve_order<Id: Clone + Eq + std::hash::Hash>(items: Vec<Id>) -> Vec<Id> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Runs the hop loop and returns the aggregate tables.
fn run_hops<B: Backend>(
    backend: &mut B,
    seeds: Vec<B::Id>,
    config: &Config,
    mut progress: Option<&mut dyn FnMut(u32, u32)>,
) -> Result<(
    HashSet<B::Id>,
    Vec<NodeRecord<B::Id, B::NodeMeta>>,
    Vec<crate::edge::EdgeRecord<B::Id, B::Extra>>,
    B::Accumulator,
)> {
    let data_config = &config.data_collection;
    let mut rng = match data_config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let mut depth: u32 = 0;
    let mut visited: HashSet<B::Id> = HashSet::new();
    let mut frontier: Vec<B::Id> = dedup_preserve_order(seeds);
    let mut nodes: Vec<NodeRecord<B::Id, B::NodeMeta>> = Vec::new();
    let mut edges: Vec<crate::edge::EdgeRecord<B::Id, B::Extra>> = Vec::new();
    let mut new_edges_buffer: EdgeTable<B::Id, B::Extra> = Vec::new();
    let mut accumulator = backend.create_node_info();

    while depth < data_config.exploration_depth && !frontier.is_empty() {
        // Step 1: budget clamp.
        let remaining_budget = data_config
            .number_of_nodes
            .map(|cap| cap.saturating_sub(visited.len()));
        let allowed = match remaining_budget {
            Some(remaining) => data_config.max_nodes_per_hop.min(remaining),
            None => data_config.max_nodes_per_hop,
        };
        if frontier.len() > allowed {
            if allowed == 0 {
                log::debug!("node budget exhausted at depth {}; terminating", depth);
                break;
            }
            frontier.truncate(allowed);
            let kept: HashSet<&B::Id> = frontier.iter().collect();
            new_edges_buffer.retain(|edge| kept.contains(&edge.target));
        }

        log::debug!(
            "hop {}: expanding {} frontier node(s)",
            depth,
            frontier.len()
        );

        // Step 2: expansion, sequential over the (post-clamp) frontier.
        let nodes_before_hop = nodes.len();
        let mut hop_edges: EdgeTable<B::Id, B::Extra> = Vec::new();
        for node in &frontier {
            let (partial, raw_edges) = backend.get_neighbors(node);
            let (partial, filtered_edges) = backend.filter(partial, raw_edges);
            nodes.extend(partial.nodes());
            accumulator = accumulator.update(partial);
            hop_edges.extend(filtered_edges);
        }

        // Step 3: hop bookkeeping.
        for record in nodes.iter_mut().skip(nodes_before_hop) {
            record.hop = depth;
        }
        visited.extend(frontier.iter().cloned());

        // Step 4: edge split.
        let (in_edges, out_edges): (Vec<_>, Vec<_>) = hop_edges
            .into_iter()
            .partition(|edge| visited.contains(&edge.target));

        // Step 5: commit.
        edges.extend(in_edges);
        edges.extend(new_edges_buffer.drain(..));

        log::debug!(
            "hop {}: {} visited total, {} kept edge(s) this hop, {} out-edge candidate(s)",
            depth,
            visited.len(),
            edges.len(),
            out_edges.len()
        );

        // Step 6: frontier selection.
        if depth + 1 < data_config.exploration_depth {
            let mut out_edges = out_edges;
            policy::annotate_degrees(&mut out_edges);
            let scores = policy::score_edges(&out_edges, data_config.expansion_type, data_config.degree);
            match policy::normalize(&scores) {
                Some(probabilities) => {
                    let size = selector::resolve_sample_size(
                        data_config.random_subset_mode,
                        out_edges.len(),
                    );
                    let (targets, selected) =
                        selector::subset(&out_edges, &probabilities, size, &mut rng);
                    new_edges_buffer = selected.into_iter().cloned().collect();
                    frontier = targets;
                }
                None => {
                    frontier = Vec::new();
                    new_edges_buffer = Vec::new();
                }
            }
        } else {
            frontier = Vec::new();
            new_edges_buffer = Vec::new();
        }

        depth += 1;
        if let Some(callback) = progress.as_deref_mut() {
            callback(depth, data_config.exploration_depth);
        }
    }

    Ok((visited, nodes, edges, accumulator))
}

/// Runs the Spiky-Ball sampler over `backend` starting from `seeds`, then
/// assembles the resulting edges into a graph.
///
/// On `ConfigError` no graph is returned. On a backend-fatal failure the
/// partially built graph is discarded — the caller receives the error, not
/// the partial result.
pub fn explore<B: Backend>(
    backend: &mut B,
    seeds: Vec<B::Id>,
    config: &Config,
    progress: Option<&mut dyn FnMut(u32, u32)>,
) -> Result<(ExploredGraph<B::Id, B::NodeMeta, B::Extra>, B::Accumulator)> {
    config.validate()?;
    if seeds.is_empty() {
        return Err(SpikyBallError::config("seeds must be non-empty"));
    }

    let (_visited, nodes, edges, accumulator) = run_hops(backend, seeds, config, progress)?;

    let mut sampled = graph::assemble(&nodes, &edges, config.graph.min_weight);
    sampled = backend.add_graph_attributes(sampled, &nodes, &edges, &accumulator);
    graph::reduce_by_degree(&mut sampled, config.graph.min_degree);
    graph::remove_unvisited_targets(&mut sampled);

    if config.graph.community_detection && !config.graph.as_undirected {
        crate::community::detect_communities_directed(
            &mut sampled,
            config.graph.min_community_size,
        );
    }

    let result = if config.graph.as_undirected {
        let mut undirected = graph::to_undirected_largest_component(&sampled);
        if config.graph.community_detection {
            crate::community::detect_communities_undirected(
                &mut undirected,
                config.graph.min_community_size,
            );
        }
        ExploredGraph::Undirected(undirected)
    } else {
        ExploredGraph::Directed(sampled)
    };

    Ok((result, accumulator))
}
