use crate::color_normalization::common::{Band, NormalizationError, Result};
use crate::color_normalization::histogram::types::{BINS, Cdf, Histogram};

/// Running sum of one band's bins, left to right.
pub fn build_cdf_band(bins: &[u64]) -> Result<[u64; BINS]> {
    let bins: &[u64; BINS] = bins.try_into().map_err(|_| NormalizationError::InvalidHistogramShape {
        expected: BINS,
        actual: bins.len(),
    })?;
    Ok(running_sum(bins))
}

pub fn build_cdf(histogram: &Histogram) -> Cdf {
    Cdf::from_arrays(Band::ALL.map(|band| running_sum(histogram.band(band))))
}

fn running_sum(bins: &[u64; BINS]) -> [u64; BINS] {
    let mut cdf = [0u64; BINS];
    let mut running = 0u64;
    for (slot, &count) in cdf.iter_mut().zip(bins) {
        running += count;
        *slot = running;
    }
    cdf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_normalization::histogram::build_histogram;

    #[test]
    fn test_cdf_is_monotonic_and_ends_at_pixel_count() {
        let red: Vec<f32> = (0..4096).map(|i| ((i * 31) % 256) as f32).collect();
        let green: Vec<f32> = (0..4096).map(|i| ((i / 16) % 256) as f32).collect();
        let blue = vec![3.0f32; 4096];
        let cdf = build_cdf(&build_histogram(&red, &green, &blue).unwrap());
        assert!(cdf.is_monotonic());
        for band in Band::ALL {
            assert_eq!(cdf.total(band), 4096);
        }
        assert_eq!(cdf.band(Band::Blue)[2], 0);
        assert_eq!(cdf.band(Band::Blue)[3], 4096);
    }

    #[test]
    fn test_band_builder_matches_histogram_builder() {
        let bins: Vec<u64> = (0..BINS as u64).map(|i| i % 5).collect();
        let hist = Histogram::from_bands(&bins, &bins, &bins).unwrap();
        assert_eq!(&build_cdf_band(&bins).unwrap(), build_cdf(&hist).band(Band::Green));
    }

    #[test]
    fn test_band_builder_rejects_wrong_shape() {
        assert!(matches!(
            build_cdf_band(&[1, 2, 3]),
            Err(NormalizationError::InvalidHistogramShape { expected: 256, actual: 3 })
        ));
    }
}
