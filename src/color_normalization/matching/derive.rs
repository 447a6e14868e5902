use crate::color_normalization::common::Band;
use crate::color_normalization::histogram::{BINS, Cdf};
use crate::color_normalization::matching::types::{MatchingFunction, MonotonicPolicy};

/// Histogram-specification lookup for one band.
///
/// Level `i` maps to the reference level `j` whose cumulative fraction is closest to
/// the tile's fraction at `i`; equal differences resolve to the smallest `j`. The two
/// CDFs are cross-multiplied by each other's totals, so a clipped edge tile compares
/// correctly against a full-size reference. If either total is zero the raw counts
/// are compared.
pub fn derive_matching_band(tile: &[u64; BINS], reference: &[u64; BINS]) -> [u8; BINS] {
    let (tile_total, reference_total) = (tile[BINS - 1], reference[BINS - 1]);
    let (tile_scale, reference_scale) = if tile_total == 0 || reference_total == 0 {
        (1u128, 1u128)
    } else {
        (reference_total as u128, tile_total as u128)
    };

    let mut lookup = [0u8; BINS];
    for (slot, &count) in lookup.iter_mut().zip(tile) {
        let scaled = count as u128 * tile_scale;
        let mut best_level = 0usize;
        let mut best_diff = u128::MAX;
        for (level, &reference_count) in reference.iter().enumerate() {
            let diff = scaled.abs_diff(reference_count as u128 * reference_scale);
            if diff < best_diff {
                best_diff = diff;
                best_level = level;
            }
        }
        *slot = best_level as u8;
    }
    lookup
}

pub fn derive_matching_function(tile: &Cdf, reference: &Cdf, policy: MonotonicPolicy) -> MatchingFunction {
    MatchingFunction::from_arrays(Band::ALL.map(|band| {
        let mut lookup = derive_matching_band(tile.band(band), reference.band(band));
        policy.apply(&mut lookup);
        lookup
    }))
}
