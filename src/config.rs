//! Typed configuration for the sampling and graph-assembly stages.
//!
//! Plain structs with sensible defaults and a single `validate()` entry
//! point called once, at `explore()`'s entry, rather than scattering checks
//! across every hop.

use crate::error::{Result, SpikyBallError};
use crate::policy::ExpansionPolicy;

/// Sizing mode for the random subset selector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RandomSubsetMode {
    /// Sample `min(n, |E|)` edges.
    Constant(usize),
    /// Sample `round(|E| * p / 100)`, clamped for small tables — see
    /// [`crate::selector::resolve_sample_size`].
    Percent(f64),
}

impl RandomSubsetMode {
    fn validate(&self) -> Result<()> {
        match self {
            RandomSubsetMode::Constant(_) => Ok(()),
            RandomSubsetMode::Percent(p) => {
                if *p > 0.0 && *p <= 100.0 {
                    Ok(())
                } else {
                    Err(SpikyBallError::config(format!(
                        "random_subset_mode percent must be in (0, 100], got {}",
                        p
                    )))
                }
            }
        }
    }
}

/// `data_collection` configuration section.
#[derive(Clone, Debug)]
pub struct SamplingConfig {
    pub exploration_depth: u32,
    pub random_subset_mode: RandomSubsetMode,
    pub expansion_type: ExpansionPolicy,
    pub degree: u32,
    pub max_nodes_per_hop: usize,
    pub number_of_nodes: Option<usize>,
    /// Seed for the run's random source. `None` draws fresh entropy, which
    /// forfeits run-to-run determinism — callers that need reproducibility
    /// must set this.
    pub seed: Option<u64>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            exploration_depth: 2,
            random_subset_mode: RandomSubsetMode::Percent(20.0),
            expansion_type: ExpansionPolicy::SpikyBall,
            degree: 0,
            max_nodes_per_hop: usize::MAX,
            number_of_nodes: None,
            seed: None,
        }
    }
}

impl SamplingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.exploration_depth < 2 {
            return Err(SpikyBallError::config(format!(
                "exploration_depth must be >= 2, got {}",
                self.exploration_depth
            )));
        }
        if self.max_nodes_per_hop == 0 {
            return Err(SpikyBallError::config(
                "max_nodes_per_hop must be > 0".to_string(),
            ));
        }
        self.random_subset_mode.validate()
    }
}

/// `graph` configuration section.
#[derive(Clone, Debug)]
pub struct GraphConfig {
    pub min_weight: f64,
    pub min_degree: usize,
    pub as_undirected: bool,
    pub community_detection: bool,
    pub min_community_size: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            min_weight: 0.0,
            min_degree: 0,
            as_undirected: false,
            community_detection: false,
            min_community_size: 1,
        }
    }
}

impl GraphConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_weight < 0.0 {
            return Err(SpikyBallError::config(format!(
                "min_weight must be >= 0, got {}",
                self.min_weight
            )));
        }
        Ok(())
    }
}

/// Top-level configuration grouping.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub data_collection: SamplingConfig,
    pub graph: GraphConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.data_collection.validate()?;
        self.graph.validate()
    }
}
