//! Community detection.
//!
//! One-level greedy modularity optimization (Clauset-Newman-Moore style
//! agglomerative merging): start with every node in its own community and
//! repeatedly merge the pair of communities that most increases modularity,
//! stopping when no merge would help.

use hashbrown::HashMap;
use petgraph::stable_graph::NodeIndex;

use crate::graph::{SampledGraph, Undirected64};

type CommunityId = usize;

struct Aggregation {
    /// Community id -> total weighted degree (sum of incident edge weights,
    /// self-loops counted twice, matching modularity's `k_i` convention).
    degree: HashMap<CommunityId, f64>,
    /// Unordered pair of community ids -> summed edge weight between them.
    between: HashMap<(CommunityId, CommunityId), f64>,
    total_weight: f64,
}

fn pair_key(a: CommunityId, b: CommunityId) -> (CommunityId, CommunityId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn build_aggregation<Id, Meta, Extra>(
    graph: &Undirected64<Id, Meta, Extra>,
    community_of: &HashMap<NodeIndex, CommunityId>,
) -> Aggregation {
    let mut degree: HashMap<CommunityId, f64> = HashMap::new();
    let mut between: HashMap<(CommunityId, CommunityId), f64> = HashMap::new();
    let mut total_weight = 0.0;

    for edge in graph.edge_indices() {
        let (a, b) = graph.edge_endpoints(edge).unwrap();
        let weight = graph[edge].weight.max(0.0);
        let ca = community_of[&a];
        let cb = community_of[&b];
        *degree.entry(ca).or_insert(0.0) += weight;
        *degree.entry(cb).or_insert(0.0) += weight;
        *between.entry(pair_key(ca, cb)).or_insert(0.0) += weight;
        total_weight += weight;
    }

    Aggregation {
        degree,
        between,
        total_weight,
    }
}

/// Runs greedy agglomerative modularity maximization and returns the
/// resulting community id for each node index (dense, `0..k`).
fn greedy_merge<Id, Meta, Extra>(graph: &Undirected64<Id, Meta, Extra>) -> HashMap<NodeIndex, usize> {
    let mut community_of: HashMap<NodeIndex, CommunityId> = graph
        .node_indices()
        .enumerate()
        .map(|(id, index)| (index, id))
        .collect();

    if graph.edge_count() == 0 {
        return community_of;
    }

    let mut aggregation = build_aggregation(graph, &community_of);
    let two_m = 2.0 * aggregation.total_weight;
    if two_m <= 0.0 {
        return community_of;
    }

    loop {
        let mut best: Option<((CommunityId, CommunityId), f64)> = None;
        for (&(a, b), &weight_between) in aggregation.between.iter() {
            if a == b {
                continue;
            }
            let a_i = aggregation.degree.get(&a).copied().unwrap_or(0.0) / two_m;
            let a_j = aggregation.degree.get(&b).copied().unwrap_or(0.0) / two_m;
            let delta_q = 2.0 * (weight_between / two_m - a_i * a_j);
            if delta_q > best.map(|(_, best_q)| best_q).unwrap_or(0.0) {
                best = Some(((a, b), delta_q));
            }
        }

        let ((from, into), _) = match best {
            Some(pair) if pair.1 > 1e-12 => pair,
            _ => break,
        };

        // Merge `from` into `into`.
        for community_id in community_of.values_mut() {
            if *community_id == from {
                *community_id = into;
            }
        }
        let moved_degree = aggregation.degree.remove(&from).unwrap_or(0.0);
        *aggregation.degree.entry(into).or_insert(0.0) += moved_degree;

        let moved_edges: Vec<((CommunityId, CommunityId), f64)> = aggregation
            .between
            .iter()
            .filter(|(&(a, b), _)| a == from || b == from)
            .map(|(&key, &weight)| (key, weight))
            .collect();
        for (key, weight) in moved_edges {
            aggregation.between.remove(&key);
            let (a, b) = key;
            let other = if a == from { b } else { a };
            if other == into {
                continue;
            }
            *aggregation
                .between
                .entry(pair_key(into, other))
                .or_insert(0.0) += weight;
        }
    }

    // Dense-pack community ids in first-appearance order for determinism.
    let mut reindex: HashMap<CommunityId, CommunityId> = HashMap::new();
    let mut next = 0;
    let mut out = HashMap::new();
    for index in graph.node_indices() {
        let raw = community_of[&index];
        let dense = *reindex.entry(raw).or_insert_with(|| {
            let id = next;
            next += 1;
            id
        });
        out.insert(index, dense);
    }
    out
}

/// Assigns a `community` id to every node of an already-undirected graph and
/// removes communities smaller than `min_community_size`.
pub fn detect_communities_undirected<Id, Meta, Extra>(
    graph: &mut Undirected64<Id, Meta, Extra>,
    min_community_size: usize,
) where
    Id: Clone + Eq + std::hash::Hash,
{
    let assignment = greedy_merge(graph);
    let mut sizes: HashMap<usize, usize> = HashMap::new();
    for &community in assignment.values() {
        *sizes.entry(community).or_insert(0) += 1;
    }
    for (&index, &community) in assignment.iter() {
        if let Some(weight) = graph.node_weight_mut(index) {
            weight.community = Some(community);
        }
    }
    let to_remove: Vec<NodeIndex> = assignment
        .iter()
        .filter(|(_, &community)| sizes[&community] < min_community_size)
        .map(|(&index, _)| index)
        .collect();
    for index in to_remove {
        graph.remove_node(index);
    }
}

/// Assigns communities to a directed [`SampledGraph`] by computing them over
/// an ephemeral undirected copy (direction is irrelevant to modularity), then
/// writing the assignment back by node id and removing undersized
/// communities from the directed graph itself.
pub fn detect_communities_directed<Id, Meta, Extra>(
    graph: &mut SampledGraph<Id, Meta, Extra>,
    min_community_size: usize,
) where
    Id: Clone + Eq + std::hash::Hash,
    Meta: Clone,
    Extra: Clone,
{
    let undirected = crate::graph::undirected_copy(graph);
    let assignment = greedy_merge(&undirected);

    let mut sizes: HashMap<usize, usize> = HashMap::new();
    for &community in assignment.values() {
        *sizes.entry(community).or_insert(0) += 1;
    }

    let mut id_to_community: HashMap<Id, usize> = HashMap::new();
    for (&index, &community) in assignment.iter() {
        id_to_community.insert(undirected[index].id.clone(), community);
    }

    let to_remove: Vec<petgraph::stable_graph::NodeIndex> = graph
        .index_of
        .iter()
        .filter_map(|(id, &index)| {
            id_to_community
                .get(id)
                .filter(|community| sizes[community] < min_community_size)
                .map(|_| index)
        })
        .collect();

    for (id, &index) in graph.index_of.iter() {
        if let Some(&community) = id_to_community.get(id) {
            if let Some(weight) = graph.graph.node_weight_mut(index) {
                weight.community = Some(community);
            }
        }
    }

    for index in to_remove {
        graph.remove_by_index(index);
    }
}
