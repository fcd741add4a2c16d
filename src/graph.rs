//! Graph assembler.
//!
//! Materializes the aggregate `Nodes`/`Edges` tables collected by the driver
//! into a `petgraph::stable_graph::StableDiGraph`, then applies the degree,
//! unvisited-target, connected-component, and community-detection reduction
//! passes. The *stable* variant is used specifically because this pass
//! removes vertices in several independent steps (degree reduction,
//! unvisited-target removal, component pruning) and needs `NodeIndex` to
//! stay valid — and the `index_of` lookup to stay accurate — across all of
//! them.

use std::collections::{HashSet, VecDeque};

use hashbrown::HashMap;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::{Directed, Undirected};

use crate::accumulator::NodeRecord;
use crate::edge::EdgeRecord;

/// Per-node payload attached to the assembled graph.
#[derive(Clone, Debug)]
pub struct NodeAttrs<Id, Meta> {
    pub id: Id,
    /// `Some(hop)` once the node was expanded by the driver; `None` for
    /// nodes that only ever appeared as an edge target.
    pub hop: Option<u32>,
    pub meta: Option<Meta>,
    pub community: Option<usize>,
}

/// Per-edge payload attached to the assembled graph.
#[derive(Clone, Debug)]
pub struct EdgeAttrs<Extra> {
    pub weight: f64,
    /// Backend-defined opaque columns, carried through verbatim. Serializing
    /// nested columns to a string form is a persistence-layer concern, out
    /// of scope here, and applies when this graph is written to a file
    /// format, not to this in-memory representation.
    pub extra: Extra,
}

type Directed64<Id, Meta, Extra> = StableGraph<NodeAttrs<Id, Meta>, EdgeAttrs<Extra>, Directed>;
pub type Undirected64<Id, Meta, Extra> = StableGraph<NodeAttrs<Id, Meta>, EdgeAttrs<Extra>, Undirected>;

/// The graph produced by `explore()`: a directed, weighted, attributed
/// graph plus an id-to-index lookup so callers can still address nodes by
/// their original `Id`.
pub struct SampledGraph<Id, Meta, Extra> {
    pub graph: Directed64<Id, Meta, Extra>,
    pub index_of: HashMap<Id, NodeIndex>,
}

impl<Id, Meta, Extra> SampledGraph<Id, Meta, Extra>
where
    Id: Clone + Eq + std::hash::Hash,
{
    pub fn number_of_nodes(&self) -> usize {
        self.graph.node_count()
    }

    pub fn number_of_edges(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_index(&self, id: &Id) -> Option<NodeIndex> {
        self.index_of.get(id).copied()
    }

    fn get_or_insert_node(&mut self, id: Id) -> NodeIndex {
        if let Some(index) = self.index_of.get(&id) {
            return *index;
        }
        let index = self.graph.add_node(NodeAttrs {
            id: id.clone(),
            hop: None,
            meta: None,
            community: None,
        });
        self.index_of.insert(id, index);
        index
    }

    fn remove(&mut self, index: NodeIndex) {
        if let Some(attrs) = self.graph.remove_node(index) {
            self.index_of.remove(&attrs.id);
        }
    }

    /// Public alias of [`SampledGraph::remove`] for callers outside this
    /// module (the community-detection pass, which removes undersized
    /// communities from the already-assembled directed graph).
    pub fn remove_by_index(&mut self, index: NodeIndex) {
        self.remove(index);
    }

    fn total_degree(&self, index: NodeIndex) -> usize {
        self.graph
            .neighbors_undirected(index)
            .count()
    }
}

/// Builds a [`SampledGraph`] from the aggregate `Nodes`/`Edges` tables.
/// Backend attribute decoration is excluded — callers apply
/// [`crate::backend::Backend::add_graph_attributes`] themselves since that
/// step needs the backend instance.
pub fn assemble<Id, Meta, Extra>(
    nodes: &[NodeRecord<Id, Meta>],
    edges: &[EdgeRecord<Id, Extra>],
    min_weight: f64,
) -> SampledGraph<Id, Meta, Extra>
where
    Id: Clone + Eq + std::hash::Hash,
    Meta: Clone,
    Extra: Clone,
{
    let mut sampled = SampledGraph {
        graph: StableGraph::new(),
        index_of: HashMap::new(),
    };

    for edge in edges.iter().filter(|edge| edge.weight >= min_weight) {
        let source = sampled.get_or_insert_node(edge.source.clone());
        let target = sampled.get_or_insert_node(edge.target.clone());
        sampled.graph.add_edge(
            source,
            target,
            EdgeAttrs {
                weight: edge.weight,
                extra: edge.extra.clone(),
            },
        );
    }

    for record in nodes {
        if let Some(&index) = sampled.index_of.get(&record.id) {
            let attrs = &mut sampled.graph[index];
            attrs.hop = Some(record.hop);
            attrs.meta = Some(record.meta.clone());
        }
    }

    sampled
}

/// Removes vertices whose (in+out) degree is below `min_degree`, then
/// removes any resulting isolates.
pub fn reduce_by_degree<Id, Meta, Extra>(graph: &mut SampledGraph<Id, Meta, Extra>, min_degree: usize)
where
    Id: Clone + Eq + std::hash::Hash,
{
    loop {
        let to_remove: Vec<NodeIndex> = graph
            .graph
            .node_indices()
            .filter(|&index| graph.total_degree(index) < min_degree)
            .collect();
        if to_remove.is_empty() {
            break;
        }
        for index in to_remove {
            graph.remove(index);
        }
    }
    remove_isolates(graph);
}

/// Removes vertices present only as edge targets, never expanded by the
/// driver (no `hop` attribute).
pub fn remove_unvisited_targets<Id, Meta, Extra>(graph: &mut SampledGraph<Id, Meta, Extra>)
where
    Id: Clone + Eq + std::hash::Hash,
{
    let to_remove: Vec<NodeIndex> = graph
        .graph
        .node_indices()
        .filter(|&index| graph.graph[index].hop.is_none())
        .collect();
    for index in to_remove {
        graph.remove(index);
    }
}

fn remove_isolates<Id, Meta, Extra>(graph: &mut SampledGraph<Id, Meta, Extra>)
where
    Id: Clone + Eq + std::hash::Hash,
{
    let isolates: Vec<NodeIndex> = graph
        .graph
        .node_indices()
        .filter(|&index| graph.total_degree(index) == 0)
        .collect();
    for index in isolates {
        graph.remove(index);
    }
}

/// Copies the directed graph into an undirected `StableGraph` with no
/// further reduction. Parallel directed edges between the same pair become
/// parallel undirected edges; no uniqueness is imposed on `Edges` here.
pub(crate) fn undirected_copy<Id, Meta, Extra>(
    graph: &SampledGraph<Id, Meta, Extra>,
) -> Undirected64<Id, Meta, Extra>
where
    Id: Clone + Eq + std::hash::Hash,
    Meta: Clone,
    Extra: Clone,
{
    let mut undirected: Undirected64<Id, Meta, Extra> = StableGraph::default();
    let mut remap: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    for index in graph.graph.node_indices() {
        let new_index = undirected.add_node(graph.graph[index].clone());
        remap.insert(index, new_index);
    }
    for edge in graph.graph.edge_indices() {
        let (source, target) = graph.graph.edge_endpoints(edge).unwrap();
        undirected.add_edge(remap[&source], remap[&target], graph.graph[edge].clone());
    }
    undirected
}

/// Converts the graph to an undirected projection and keeps only the
/// largest connected component.
pub fn to_undirected_largest_component<Id, Meta, Extra>(
    graph: &SampledGraph<Id, Meta, Extra>,
) -> Undirected64<Id, Meta, Extra>
where
    Id: Clone + Eq + std::hash::Hash,
    Meta: Clone,
    Extra: Clone,
{
    let mut undirected = undirected_copy(graph);

    let components = connected_components(&undirected);
    let largest: HashSet<NodeIndex> = components
        .into_iter()
        .max_by_key(|component| component.len())
        .unwrap_or_default()
        .into_iter()
        .collect();
    let to_remove: Vec<NodeIndex> = undirected
        .node_indices()
        .filter(|index| !largest.contains(index))
        .collect();
    for index in to_remove {
        undirected.remove_node(index);
    }
    undirected
}

/// Plain BFS connected components over an undirected `StableGraph`, rather
/// than petgraph's directed-only SCC algorithms.
pub fn connected_components<N, E>(graph: &StableGraph<N, E, Undirected>) -> Vec<Vec<NodeIndex>> {
    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut components = Vec::new();
    for start in graph.node_indices() {
        if visited.contains(&start) {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        visited.insert(start);
        while let Some(node) = queue.pop_front() {
            component.push(node);
            for neighbor in graph.neighbors(node) {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        components.push(component);
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::NodeRecord;
    use crate::edge::EdgeRecord;

    fn build_triangle() -> SampledGraph<u32, (), ()> {
        let edges = vec![
            EdgeRecord::new(1u32, 2u32, 1.0, ()),
            EdgeRecord::new(2u32, 3u32, 1.0, ()),
            EdgeRecord::new(3u32, 1u32, 1.0, ()),
        ];
        let nodes = vec![
            NodeRecord { id: 1, hop: 0, meta: () },
            NodeRecord { id: 2, hop: 1, meta: () },
            NodeRecord { id: 3, hop: 1, meta: () },
        ];
        assemble(&nodes, &edges, 0.0)
    }

    #[test]
    fn assemble_introduces_vertices_only_as_edge_endpoints() {
        let graph = build_triangle();
        assert_eq!(graph.number_of_nodes(), 3);
        assert_eq!(graph.number_of_edges(), 3);
    }

    #[test]
    fn min_weight_drops_light_edges() {
        let edges = vec![
            EdgeRecord::new(1u32, 2u32, 0.1, ()),
            EdgeRecord::new(1u32, 3u32, 5.0, ()),
        ];
        let graph = assemble::<u32, (), ()>(&[], &edges, 1.0);
        assert_eq!(graph.number_of_edges(), 1);
    }

    #[test]
    fn connected_components_finds_triangle_as_single_component() {
        let graph = build_triangle();
        let undirected = to_undirected_largest_component(&graph);
        assert_eq!(undirected.node_count(), 3);
    }

    #[test]
    fn remove_unvisited_targets_drops_never_expanded_nodes() {
        let edges = vec![EdgeRecord::new(1u32, 2u32, 1.0, ())];
        let nodes = vec![NodeRecord { id: 1, hop: 0, meta: () }];
        let mut graph = assemble(&nodes, &edges, 0.0);
        assert_eq!(graph.number_of_nodes(), 2);
        remove_unvisited_targets(&mut graph);
        assert_eq!(graph.number_of_nodes(), 1);
        assert!(graph.node_index(&1).is_some());
        assert!(graph.node_index(&2).is_none());
    }

    #[test]
    fn reduce_by_degree_removes_low_degree_vertices_and_isolates() {
        // Star graph: hub has degree 3, leaves have degree 1.
        let edges = vec![
            EdgeRecord::new(1u32, 2u32, 1.0, ()),
            EdgeRecord::new(1u32, 3u32, 1.0, ()),
            EdgeRecord::new(1u32, 4u32, 1.0, ()),
        ];
        let mut graph = assemble::<u32, (), ()>(&[], &edges, 0.0);
        reduce_by_degree(&mut graph, 2);
        assert_eq!(graph.number_of_nodes(), 0);
    }
}
