//! Histogram and CDF value types

use crate::color_normalization::common::{Band, NormalizationError, Result};

/// Number of intensity levels per band
pub const BINS: usize = 256;

/// Per-band pixel counts over the 256 intensity levels.
///
/// Never mutated once built; the bins of each band sum to the tile's pixel count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    bands: [[u64; BINS]; 3],
}

impl Histogram {
    pub(crate) fn from_arrays(bands: [[u64; BINS]; 3]) -> Self {
        Self { bands }
    }

    /// Builds a histogram from per-band bin vectors, rejecting any band without exactly 256 bins.
    pub fn from_bands(red: &[u64], green: &[u64], blue: &[u64]) -> Result<Self> {
        Ok(Self {
            bands: [to_bins(red)?, to_bins(green)?, to_bins(blue)?],
        })
    }

    pub fn band(&self, band: Band) -> &[u64; BINS] {
        &self.bands[band.index()]
    }

    pub fn pixel_count(&self, band: Band) -> u64 {
        self.band(band).iter().sum()
    }
}

/// Running per-band sums of a histogram. Non-decreasing; the last entry is the pixel count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cdf {
    bands: [[u64; BINS]; 3],
}

impl Cdf {
    pub(crate) fn from_arrays(bands: [[u64; BINS]; 3]) -> Self {
        Self { bands }
    }

    /// Wraps already-cumulative band sequences, e.g. a reference distribution received
    /// from the match service. Only the shape is checked here; see [`Cdf::is_monotonic`].
    pub fn from_bands(red: &[u64], green: &[u64], blue: &[u64]) -> Result<Self> {
        Ok(Self {
            bands: [to_bins(red)?, to_bins(green)?, to_bins(blue)?],
        })
    }

    pub fn band(&self, band: Band) -> &[u64; BINS] {
        &self.bands[band.index()]
    }

    pub fn total(&self, band: Band) -> u64 {
        self.band(band)[BINS - 1]
    }

    pub fn is_monotonic(&self) -> bool {
        self.bands
            .iter()
            .all(|band| band.windows(2).all(|pair| pair[0] <= pair[1]))
    }
}

fn to_bins(values: &[u64]) -> Result<[u64; BINS]> {
    values
        .try_into()
        .map_err(|_| NormalizationError::InvalidHistogramShape {
            expected: BINS,
            actual: values.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bands_rejects_wrong_bin_count() {
        let ok = vec![1u64; BINS];
        let short = vec![1u64; 255];
        let err = Histogram::from_bands(&ok, &short, &ok).unwrap_err();
        assert!(matches!(
            err,
            NormalizationError::InvalidHistogramShape { expected: 256, actual: 255 }
        ));
        assert!(Cdf::from_bands(&ok, &ok, &vec![0u64; 300]).is_err());
    }

    #[test]
    fn test_cdf_monotonic_check() {
        let rising: Vec<u64> = (0..BINS as u64).collect();
        let mut dipping = rising.clone();
        dipping[100] = 3;
        assert!(Cdf::from_bands(&rising, &rising, &rising).unwrap().is_monotonic());
        assert!(!Cdf::from_bands(&rising, &dipping, &rising).unwrap().is_monotonic());
    }
}
