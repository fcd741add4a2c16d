//! Edge probability model.
//!
//! Pure, side-effect-free functions over edge slices: compute once, return
//! owned data, no shared mutable state.

use hashbrown::HashMap;

use crate::edge::EdgeRecord;
use crate::error::{Result, SpikyBallError};

/// One of the five expansion policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpansionPolicy {
    SpikyBall,
    HubBall,
    CoreBall,
    FireBall,
    FireCoreBall,
}

impl ExpansionPolicy {
    /// Parses the `expansion_type` configuration string. Unknown policy
    /// names fail with `ConfigError`.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "spikyball" => Ok(ExpansionPolicy::SpikyBall),
            "hubball" => Ok(ExpansionPolicy::HubBall),
            "coreball" => Ok(ExpansionPolicy::CoreBall),
            "fireball" => Ok(ExpansionPolicy::FireBall),
            "firecoreball" => Ok(ExpansionPolicy::FireCoreBall),
            other => Err(SpikyBallError::config(format!(
                "unknown expansion_type {:?}",
                other
            ))),
        }
    }

    /// The `(alpha, beta, gamma)` exponents of the scoring table below.
    /// `beta` is always `1` across all five policies.
    fn exponents(self, k: u32) -> (i64, i64, i64) {
        let k = k as i64;
        match self {
            ExpansionPolicy::SpikyBall => (0, 1, 0),
            ExpansionPolicy::HubBall => (k, 1, 0),
            ExpansionPolicy::CoreBall => (0, 1, k),
            ExpansionPolicy::FireBall => (-1, 1, 0),
            ExpansionPolicy::FireCoreBall => (-1, 1, k),
        }
    }
}

/// `0^0 = 1`; `x^{-n}` for `x == 0` is the caller's responsibility to
/// special-case (see `score_edges`).
fn signed_pow(base: f64, exponent: i64) -> f64 {
    if exponent == 0 {
        1.0
    } else if exponent >= 0 {
        base.powi(exponent as i32)
    } else {
        base.powi(exponent as i32)
    }
}

/// Fills `degree_source`/`degree_target` on every row from the sums of
/// `weight` grouped by `source`/`target` *within this table*: computed once
/// per hop, over the current hop's out-edges table, never the global graph.
pub fn annotate_degrees<Id, Extra>(edges: &mut [EdgeRecord<Id, Extra>])
where
    Id: Clone + Eq + std::hash::Hash,
{
    let mut by_source: HashMap<Id, f64> = HashMap::new();
    let mut by_target: HashMap<Id, f64> = HashMap::new();
    for edge in edges.iter() {
        *by_source.entry(edge.source.clone()).or_insert(0.0) += edge.weight;
        *by_target.entry(edge.target.clone()).or_insert(0.0) += edge.weight;
    }
    for edge in edges.iter_mut() {
        edge.degree_source = by_source[&edge.source];
        edge.degree_target = by_target[&edge.target];
    }
}

/// Computes the unnormalized per-edge score for the given policy. Edges must
/// already carry `degree_source`/`degree_target` (see [`annotate_degrees`]).
pub fn score_edges<Id, Extra>(
    edges: &[EdgeRecord<Id, Extra>],
    policy: ExpansionPolicy,
    k: u32,
) -> Vec<f64> {
    let (alpha, beta, gamma) = policy.exponents(k);
    edges
        .iter()
        .map(|edge| {
            let src_term = if alpha < 0 && edge.degree_source == 0.0 {
                // 0^{-1} (and further negative powers) are undefined;
                // treat these candidates as unselectable.
                0.0
            } else {
                signed_pow(edge.degree_source, alpha)
            };
            if src_term == 0.0 {
                return 0.0;
            }
            let weight_term = signed_pow(edge.weight, beta);
            let tgt_term = if gamma < 0 && edge.degree_target == 0.0 {
                0.0
            } else {
                signed_pow(edge.degree_target, gamma)
            };
            src_term * weight_term * tgt_term
        })
        .collect()
}

/// L1-normalizes `scores`. Returns `None` when the table is empty or every
/// score is zero — both are treated as an empty candidate set.
pub fn normalize(scores: &[f64]) -> Option<Vec<f64>> {
    if scores.is_empty() {
        return None;
    }
    let sum: f64 = scores.iter().sum();
    if sum <= 0.0 {
        return None;
    }
    Some(scores.iter().map(|s| s / sum).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeRecord;

    fn edge(source: u32, target: u32, weight: f64) -> EdgeRecord<u32, ()> {
        EdgeRecord::new(source, target, weight, ())
    }

    #[test]
    fn spikyball_probability_proportional_to_weight() {
        let mut edges = vec![edge(1, 2, 1.0), edge(1, 3, 2.0), edge(1, 4, 3.0)];
        annotate_degrees(&mut edges);
        let scores = score_edges(&edges, ExpansionPolicy::SpikyBall, 0);
        let probs = normalize(&scores).unwrap();
        assert!((probs[0] - 1.0 / 6.0).abs() < 1e-9);
        assert!((probs[1] - 2.0 / 6.0).abs() < 1e-9);
        assert!((probs[2] - 3.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let mut edges = vec![edge(1, 2, 5.0), edge(2, 3, 1.0), edge(2, 4, 1.0)];
        annotate_degrees(&mut edges);
        let scores = score_edges(&edges, ExpansionPolicy::CoreBall, 2);
        let probs = normalize(&scores).unwrap();
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn coreball_k0_matches_spikyball() {
        let mut a = vec![edge(1, 2, 1.0), edge(1, 3, 4.0)];
        let mut b = a.clone();
        annotate_degrees(&mut a);
        annotate_degrees(&mut b);
        let scores_a = normalize(&score_edges(&a, ExpansionPolicy::SpikyBall, 0)).unwrap();
        let scores_b = normalize(&score_edges(&b, ExpansionPolicy::CoreBall, 0)).unwrap();
        assert_eq!(scores_a, scores_b);
    }

    #[test]
    fn fireball_zero_source_degree_is_never_selected() {
        // A single edge's deg_src always equals its own weight (no sibling
        // edges share the source), so deg_src = 0 only when weight = 0.
        let mut edges = vec![edge(1, 2, 0.0), edge(3, 4, 1.0)];
        annotate_degrees(&mut edges);
        let scores = score_edges(&edges, ExpansionPolicy::FireBall, 0);
        assert_eq!(scores[0], 0.0);
    }

    #[test]
    fn unknown_policy_is_config_error() {
        assert!(ExpansionPolicy::parse("nonsense").is_err());
    }
}
