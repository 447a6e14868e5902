use crate::color_normalization::common::{Band, NormalizationError, Result};
use crate::color_normalization::histogram::types::{BINS, Histogram};

/// Upper edge of the intensity domain. The last bin is closed: `[255, 256]`.
const DOMAIN_MAX: f32 = BINS as f32;

/// Bins three equal-length band sample sequences into a 256-bin histogram.
///
/// Sample `v` lands in bin `floor(v)`, with `256.0` folded into bin 255. Samples below 0,
/// above 256 or NaN are rejected with `InvalidSampleRange` instead of being clamped.
pub fn build_histogram(red: &[f32], green: &[f32], blue: &[f32]) -> Result<Histogram> {
    if red.len() != green.len() || red.len() != blue.len() {
        return Err(NormalizationError::BandLengthMismatch {
            red: red.len(),
            green: green.len(),
            blue: blue.len(),
        });
    }

    let mut bins = [[0u64; BINS]; 3];
    for (band, samples) in Band::ALL.into_iter().zip([red, green, blue]) {
        let counts = &mut bins[band.index()];
        for &value in samples {
            counts[bin_index(band, value)?] += 1;
        }
    }

    Ok(Histogram::from_arrays(bins))
}

fn bin_index(band: Band, value: f32) -> Result<usize> {
    // NaN fails both comparisons and falls through to the error.
    if value >= 0.0 && value <= DOMAIN_MAX {
        Ok((value as usize).min(BINS - 1))
    } else {
        Err(NormalizationError::InvalidSampleRange { band, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bins_sum_to_pixel_count() {
        let red: Vec<f32> = (0..1000).map(|i| (i % 256) as f32).collect();
        let green: Vec<f32> = (0..1000).map(|i| ((i * 7) % 256) as f32 + 0.5).collect();
        let blue = vec![128.0f32; 1000];
        let hist = build_histogram(&red, &green, &blue).unwrap();
        for band in Band::ALL {
            assert_eq!(hist.pixel_count(band), 1000);
        }
        assert_eq!(hist.band(Band::Blue)[128], 1000);
    }

    #[test]
    fn test_half_open_bins() {
        let samples = [0.0f32, 0.999, 1.0, 254.5, 255.0, 255.99, 256.0];
        let hist = build_histogram(&samples, &samples, &samples).unwrap();
        let red = hist.band(Band::Red);
        assert_eq!(red[0], 2);
        assert_eq!(red[1], 1);
        assert_eq!(red[254], 1);
        assert_eq!(red[255], 3);
    }

    #[test]
    fn test_out_of_domain_samples_are_rejected() {
        for bad in [-0.01f32, 256.01, 1000.0, f32::NAN] {
            let red = [10.0f32];
            let blue = [bad];
            let err = build_histogram(&red, &red, &blue).unwrap_err();
            assert!(
                matches!(err, NormalizationError::InvalidSampleRange { band: Band::Blue, .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_mismatched_band_lengths() {
        let err = build_histogram(&[1.0, 2.0], &[1.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            NormalizationError::BandLengthMismatch { red: 2, green: 1, blue: 2 }
        ));
    }

    #[test]
    fn test_empty_tile_yields_empty_histogram() {
        let hist = build_histogram(&[], &[], &[]).unwrap();
        assert_eq!(hist.pixel_count(Band::Red), 0);
    }
}
