//! Backend interface.
//!
//! The backend is the crate's only collaborator that performs I/O. Every
//! method here is synchronous from the driver's point of view: the driver
//! treats each call as potentially slow and never holds a lock across one.
//! Concrete adapters (social feed, encyclopedia, synthetic graph) are out of
//! this crate's scope; [`crate::test_utilities`] ships one synthetic
//! implementation purely for the test suite.

use std::fmt::Debug;
use std::hash::Hash;

use crate::accumulator::{NodeInfoAccumulator, NodeRecord};
use crate::edge::EdgeTable;
use crate::graph::SampledGraph;

/// Bound satisfied by any type a backend chooses to use as its node
/// identifier. The sampler never inspects the structure of `Id`, only
/// hashes, clones, and compares it.
pub trait NodeIdentifier: Clone + Eq + Hash + Debug {}
impl<T: Clone + Eq + Hash + Debug> NodeIdentifier for T {}

/// Lazy neighbor oracle plus per-hop metadata producer.
///
/// Type parameters are resolved by the implementing backend:
/// - `Id` — opaque node identifier.
/// - `Extra` — opaque per-edge columns passed through to the graph
///   assembler untouched.
/// - `NodeMeta` — backend-defined per-node metadata, carrying at least the
///   hop depth once stamped by the driver.
/// - `Accumulator` — the opaque node-info fold, see [`crate::accumulator`].
pub trait Backend {
    type Id: NodeIdentifier;
    type Extra: Clone;
    type NodeMeta: Clone;
    type Accumulator: NodeInfoAccumulator<Id = Self::Id, Meta = Self::NodeMeta> + Clone;

    /// A fresh, empty accumulator.
    fn create_node_info(&self) -> Self::Accumulator;

    /// Fetches the outgoing edges of `node`.
    ///
    /// Must fail soft: on any transient error this must return an *empty*
    /// table and an unchanged accumulator partial, never propagate an
    /// exception/panic. Unrecoverable failures are reported through
    /// [`crate::SpikyBallError::Backend`] by having the caller's wrapping
    /// code bail out, not through this method's return type — see the
    /// crate-level docs for the rationale.
    fn get_neighbors(
        &mut self,
        node: &Self::Id,
    ) -> (Self::Accumulator, EdgeTable<Self::Id, Self::Extra>);

    /// Backend-specific pruning of edges and, possibly, node data. Must be
    /// pure with respect to the caller's state.
    fn filter(
        &self,
        partial: Self::Accumulator,
        edges: EdgeTable<Self::Id, Self::Extra>,
    ) -> (Self::Accumulator, EdgeTable<Self::Id, Self::Extra>);

    /// Projects the kept edges onto their unique targets with a
    /// backend-chosen weight. Currently used only as a presence indicator;
    /// default implementation returns an empty mapping for backends that
    /// have no use for it.
    fn neighbors_with_weights(
        &self,
        _edges: &EdgeTable<Self::Id, Self::Extra>,
    ) -> hashbrown::HashMap<Self::Id, f64> {
        hashbrown::HashMap::new()
    }

    /// Called once by the graph assembler to decorate the final graph with
    /// backend-specific attributes.
    fn add_graph_attributes(
        &self,
        graph: SampledGraph<Self::Id, Self::NodeMeta, Self::Extra>,
        nodes: &[NodeRecord<Self::Id, Self::NodeMeta>],
        edges: &EdgeTable<Self::Id, Self::Extra>,
        accumulator: &Self::Accumulator,
    ) -> SampledGraph<Self::Id, Self::NodeMeta, Self::Extra>;
}
