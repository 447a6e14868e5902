//! Matching function types

use crate::color_normalization::common::{Band, NormalizationError, Result};
use crate::color_normalization::histogram::BINS;
use crate::color_normalization::raster::TileRegion;

/// How derived lookups are post-processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonotonicPolicy {
    /// Clamp each band lookup to its running maximum so brightness order is preserved
    #[default]
    RunningMax,
    /// Keep the raw nearest-CDF mapping as derived
    Preserve,
}

impl MonotonicPolicy {
    pub fn apply(self, lookup: &mut [u8; BINS]) {
        if self == MonotonicPolicy::Preserve {
            return;
        }
        let mut ceiling = 0u8;
        for level in lookup.iter_mut() {
            ceiling = ceiling.max(*level);
            *level = ceiling;
        }
    }
}

/// Per-band lookup table remapping an input intensity level to an output level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingFunction {
    bands: [[u8; BINS]; 3],
}

impl MatchingFunction {
    pub(crate) fn from_arrays(bands: [[u8; BINS]; 3]) -> Self {
        Self { bands }
    }

    pub fn identity() -> Self {
        let mut lookup = [0u8; BINS];
        for (level, slot) in lookup.iter_mut().enumerate() {
            *slot = level as u8;
        }
        Self { bands: [lookup; 3] }
    }

    pub fn from_bands(red: &[u8], green: &[u8], blue: &[u8]) -> Result<Self> {
        let to_lookup = |values: &[u8]| -> Result<[u8; BINS]> {
            values
                .try_into()
                .map_err(|_| NormalizationError::InvalidHistogramShape {
                    expected: BINS,
                    actual: values.len(),
                })
        };
        Ok(Self {
            bands: [to_lookup(red)?, to_lookup(green)?, to_lookup(blue)?],
        })
    }

    pub fn band(&self, band: Band) -> &[u8; BINS] {
        &self.bands[band.index()]
    }

    pub fn map_level(&self, band: Band, level: u8) -> u8 {
        self.bands[band.index()][level as usize]
    }

    pub fn is_monotonic(&self) -> bool {
        self.bands
            .iter()
            .all(|band| band.windows(2).all(|pair| pair[0] <= pair[1]))
    }
}

/// Population variance of the aggregated outputs at each input level, per band.
///
/// High variance at a level means the contributing tiles disagreed on where that
/// level should go, and the averaged output there is less trustworthy.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSpread {
    variance: [[f64; BINS]; 3],
}

impl LevelSpread {
    pub(crate) fn from_arrays(variance: [[f64; BINS]; 3]) -> Self {
        Self { variance }
    }

    pub fn variance(&self, band: Band, level: u8) -> f64 {
        self.variance[band.index()][level as usize]
    }

    pub fn max_variance(&self, band: Band) -> f64 {
        self.variance[band.index()].iter().copied().fold(0.0, f64::max)
    }

    pub fn mean_variance(&self, band: Band) -> f64 {
        self.variance[band.index()].iter().sum::<f64>() / BINS as f64
    }
}

/// Output of a pipeline run: the averaged correction plus what went into it
#[derive(Debug, Clone)]
pub struct GlobalCorrectionFunction {
    /// Per-band correction lookup for the whole image
    pub function: MatchingFunction,
    /// Disagreement between contributing tiles at every level
    pub spread: LevelSpread,
    /// Number of tile functions averaged into `function`
    pub contributing_tiles: usize,
    /// Selected tiles left out because their reference lookup failed or was rejected
    pub skipped_tiles: Vec<TileRegion>,
}
