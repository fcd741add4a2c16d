//! Inhomogeneous filtered diffusion sampling ("Spiky-Ball") over an
//! implicit, possibly very large directed graph whose neighborhood function
//! is accessed lazily through a pluggable [`Backend`].
//!
//! The crate's single entry point is [`explore`]. Backend adapters for
//! concrete data sources, persistence, and a CLI are out of scope.

mod accumulator;
mod backend;
mod community;
mod config;
mod driver;
mod edge;
mod error;
mod graph;
mod policy;
mod selector;
pub mod test_utilities;

pub use accumulator::{NodeInfoAccumulator, NodeRecord};
pub use backend::{Backend, NodeIdentifier};
pub use config::{Config, GraphConfig, RandomSubsetMode, SamplingConfig};
pub use driver::{explore, ExploredGraph};
pub use edge::{EdgeRecord, EdgeTable};
pub use error::{Result, SpikyBallError};
pub use graph::{connected_components, EdgeAttrs, NodeAttrs, SampledGraph, Undirected64};
pub use policy::ExpansionPolicy;
