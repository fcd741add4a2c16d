//! Column-oriented per-hop edge table.
//!
//! During a hop the driver only ever appends rows and reads `source`/
//! `target`/`weight`; a `petgraph` view is materialized later, at the graph
//! assembly boundary, never during the hop itself.

/// A single candidate or kept edge.
///
/// `degree_source`/`degree_target` are populated by the edge probability
/// model from the *current hop's* out-edge table, not the global graph.
#[derive(Clone, Debug)]
pub struct EdgeRecord<Id, Extra> {
    pub source: Id,
    pub target: Id,
    pub weight: f64,
    pub degree_source: f64,
    pub degree_target: f64,
    pub extra: Extra,
}

impl<Id, Extra> EdgeRecord<Id, Extra> {
    /// Constructs a raw edge record as returned by `Backend::get_neighbors`,
    /// before the per-hop degree fields are filled in by the probability
    /// model.
    pub fn new(source: Id, target: Id, weight: f64, extra: Extra) -> Self {
        Self {
            source,
            target,
            weight,
            degree_source: 0.0,
            degree_target: 0.0,
            extra,
        }
    }
}

/// A plain vector of edges.
pub type EdgeTable<Id, Extra> = Vec<EdgeRecord<Id, Extra>>;
