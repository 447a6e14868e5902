use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use crate::color_normalization::common::{NormalizationError, Result};
use crate::color_normalization::histogram::Histogram;
use crate::color_normalization::selection::distance::histogram_distance;

/// Picks `count` mutually distant histograms from `candidates` and returns their
/// indices in selection order.
///
/// The first pick is drawn uniformly from a `StdRng` seeded with `seed`. Each later
/// pick is the candidate whose distance to its *nearest* selected histogram is
/// largest; ties go to the lowest candidate index. The same seed and candidate
/// order always produce the same selection.
///
/// Runs O(count * candidates) distance evaluations by keeping each candidate's
/// nearest-selected distance up to date as picks are added.
#[instrument(skip(candidates), fields(candidates = candidates.len()))]
pub fn select_diverse(candidates: &[Histogram], count: usize, seed: u64) -> Result<Vec<usize>> {
    if count > candidates.len() {
        return Err(NormalizationError::InsufficientCandidates {
            requested: count,
            available: candidates.len(),
        });
    }
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let first = rng.gen_range(0..candidates.len());

    let mut selected = Vec::with_capacity(count);
    let mut taken = vec![false; candidates.len()];
    let mut nearest = vec![f64::INFINITY; candidates.len()];
    selected.push(first);
    taken[first] = true;
    debug!(index = first, "Seeded diverse set");

    while selected.len() < count {
        let last = &candidates[selected[selected.len() - 1]];

        let mut best: Option<(usize, f64)> = None;
        for (index, candidate) in candidates.iter().enumerate() {
            if taken[index] {
                continue;
            }
            nearest[index] = nearest[index].min(histogram_distance(candidate, last));
            if best.is_none_or(|(_, best_distance)| nearest[index] > best_distance) {
                best = Some((index, nearest[index]));
            }
        }

        // count <= candidates.len() guarantees an untaken candidate remains.
        let Some((index, distance)) = best else { break };
        taken[index] = true;
        selected.push(index);
        debug!(index, distance, "Added diverse sample");
    }

    Ok(selected)
}
