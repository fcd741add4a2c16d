//! Random subset selector.
//!
//! Sampling without replacement, weighted by the normalized distribution
//! computed in [`crate::policy`]. Uses the Efraimidis-Spirakis A-ExpJ
//! scheme (draw `key_i = u_i^{1/w_i}`, keep the top-`n` keys), which needs
//! only a single `rand::Rng` draw per candidate and no repeated
//! renormalization — a better fit for the driver's single RNG instance than
//! a resampling-with-removal loop.

use rand::Rng;

use crate::config::RandomSubsetMode;
use crate::edge::EdgeRecord;

/// Resolves a sizing mode against a candidate-table length.
///
/// Preserves a legacy `percent` clamp verbatim: when the rounded size would
/// be `< 2`, it is bumped up to `min(|E|, 10)`, which can *increase* the
/// sample beyond the requested ratio for small tables. Flagged, not
/// silently changed.
pub fn resolve_sample_size(mode: RandomSubsetMode, total: usize) -> usize {
    match mode {
        RandomSubsetMode::Constant(n) => n.min(total),
        RandomSubsetMode::Percent(p) => {
            let rounded = ((total as f64) * p / 100.0).round() as usize;
            if rounded < 2 {
                log::warn!(
                    "random_subset_mode percent({}) rounded to {} on a table of {} edges; \
                     clamping to min(|E|, 10) per the legacy percent-mode behavior",
                    p,
                    rounded,
                    total
                );
                total.min(10)
            } else {
                rounded.min(total)
            }
        }
    }
}

/// Draws `size` edges from `edges` without replacement, weighted by
/// `probabilities` (one entry per edge, need not be pre-normalized to sum to
/// exactly 1.0 as long as all entries are non-negative).
///
/// Returns the selected edges in original relative order together with the
/// list of unique targets in first-occurrence order. An empty input or a
/// `size` of zero returns empty results.
pub fn subset<'a, Id, Extra, R: Rng + ?Sized>(
    edges: &'a [EdgeRecord<Id, Extra>],
    probabilities: &[f64],
    size: usize,
    rng: &mut R,
) -> (Vec<Id>, Vec<&'a EdgeRecord<Id, Extra>>)
where
    Id: Clone + Eq + std::hash::Hash,
{
    if edges.is_empty() || size == 0 {
        return (Vec::new(), Vec::new());
    }
    debug_assert_eq!(edges.len(), probabilities.len());

    let mut keyed: Vec<(f64, usize)> = probabilities
        .iter()
        .enumerate()
        .map(|(index, &weight)| {
            let u: f64 = rng.gen_range(1e-12..1.0);
            let key = if weight > 0.0 {
                u.powf(1.0 / weight)
            } else {
                // Zero-weight candidates are never preferred over any
                // positive-weight one: their key collapses to 0.
                0.0
            };
            (key, index)
        })
        .collect();

    keyed.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    let mut selected_indices: Vec<usize> = keyed.into_iter().take(size).map(|(_, i)| i).collect();
    selected_indices.sort_unstable();

    let mut targets = Vec::with_capacity(selected_indices.len());
    let mut seen = hashbrown::HashSet::new();
    let mut selected_edges = Vec::with_capacity(selected_indices.len());
    for index in selected_indices {
        let edge = &edges[index];
        if seen.insert(edge.target.clone()) {
            targets.push(edge.target.clone());
        }
        selected_edges.push(edge);
    }
    (targets, selected_edges)
}
