//! Node-info accumulator.
//!
//! The accumulator is opaque to the driver: it only ever calls
//! [`NodeInfoAccumulator::update`] after a successful `get_neighbors` +
//! `filter` pair, and reads node rows back out through
//! [`NodeInfoAccumulator::nodes`] to fold into the aggregate `Nodes` table.
//! The driver never assumes `update` is associative or commutative.

/// One row of the `Nodes` aggregate table.
///
/// `hop` is stamped by the driver at the end of each hop, overwriting
/// whatever the backend may have set — a node is expanded exactly once, so
/// there is exactly one true hop value per node.
#[derive(Clone, Debug)]
pub struct NodeRecord<Id, Meta> {
    pub id: Id,
    pub hop: u32,
    pub meta: Meta,
}

/// Backend-owned fold of per-node metadata across the whole run.
///
/// Implementors decide their own internal representation; the driver treats
/// values of this trait as write-only except for the final `nodes()` read
/// used to populate the `Nodes` aggregate table.
pub trait NodeInfoAccumulator: Sized {
    type Id;
    type Meta;

    /// Folds `partial` (metadata produced while expanding one node) into
    /// `self`. Not required to be commutative; the driver calls this in the
    /// order nodes are processed within a hop, hops in order.
    fn update(self, partial: Self) -> Self;

    /// The node metadata rows this accumulator currently knows about. Called
    /// by the driver once per node, right after `filter`, to populate the
    /// `Nodes` aggregate table.
    fn nodes(&self) -> Vec<NodeRecord<Self::Id, Self::Meta>>;
}
