use tracing::debug;

use crate::color_normalization::common::{Band, NormalizationError, Result};
use crate::color_normalization::histogram::BINS;
use crate::color_normalization::matching::types::{LevelSpread, MatchingFunction};

/// Averages per-tile lookups level by level, independently per band.
///
/// Each output level is the arithmetic mean of the inputs at that level, rounded
/// half up. The population variance at every level is returned alongside so callers
/// can judge how well the tiles agreed.
pub fn aggregate_functions(functions: &[MatchingFunction]) -> Result<(MatchingFunction, LevelSpread)> {
    if functions.is_empty() {
        return Err(NormalizationError::EmptyFunctionSet);
    }

    let n = functions.len() as u64;
    let mut mean = [[0u8; BINS]; 3];
    let mut variance = [[0.0f64; BINS]; 3];

    for band in Band::ALL {
        for level in 0..BINS {
            let (sum, sum_sq) = functions.iter().fold((0u64, 0u64), |(sum, sum_sq), function| {
                let value = function.band(band)[level] as u64;
                (sum + value, sum_sq + value * value)
            });
            mean[band.index()][level] = ((2 * sum + n) / (2 * n)) as u8;

            let average = sum as f64 / n as f64;
            variance[band.index()][level] = (sum_sq as f64 / n as f64 - average * average).max(0.0);
        }
    }

    let spread = LevelSpread::from_arrays(variance);
    debug!(
        functions = functions.len(),
        max_variance_red = spread.max_variance(Band::Red),
        max_variance_green = spread.max_variance(Band::Green),
        max_variance_blue = spread.max_variance(Band::Blue),
        "Aggregated matching functions"
    );

    Ok((MatchingFunction::from_arrays(mean), spread))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(red: u8, green: u8, blue: u8) -> MatchingFunction {
        MatchingFunction::from_bands(&[red; BINS], &[green; BINS], &[blue; BINS]).unwrap()
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(aggregate_functions(&[]), Err(NormalizationError::EmptyFunctionSet)));
    }

    #[test]
    fn test_single_function_is_returned_unchanged() {
        let function = MatchingFunction::identity();
        let (aggregated, spread) = aggregate_functions(std::slice::from_ref(&function)).unwrap();
        assert_eq!(aggregated, function);
        assert_eq!(spread.max_variance(Band::Red), 0.0);
    }

    #[test]
    fn test_copies_are_returned_unchanged() {
        let function = constant(12, 130, 255);
        let copies = vec![function.clone(); 7];
        let (aggregated, spread) = aggregate_functions(&copies).unwrap();
        assert_eq!(aggregated, function);
        for band in Band::ALL {
            assert_eq!(spread.mean_variance(band), 0.0);
        }
    }

    #[test]
    fn test_mean_is_per_band_and_per_level() {
        let (aggregated, _) = aggregate_functions(&[constant(10, 0, 100), constant(20, 255, 50)]).unwrap();
        assert_eq!(aggregated.map_level(Band::Red, 0), 15);
        assert_eq!(aggregated.map_level(Band::Blue, 200), 75);

        let mut rising = [0u8; BINS];
        rising[5] = 9;
        let a = MatchingFunction::from_bands(&rising, &rising, &rising).unwrap();
        let (aggregated, spread) = aggregate_functions(&[a, constant(0, 0, 0)]).unwrap();
        assert_eq!(aggregated.map_level(Band::Green, 5), 5);
        assert_eq!(aggregated.map_level(Band::Green, 6), 0);
        assert!((spread.variance(Band::Green, 5) - 20.25).abs() < 1e-9);
        assert_eq!(spread.variance(Band::Green, 6), 0.0);
    }

    #[test]
    fn test_halves_round_up() {
        // Green: (0 + 255) / 2 = 127.5 -> 128. Red: (1 + 2 + 2) / 3 = 1.67 -> 2.
        let (aggregated, _) = aggregate_functions(&[constant(1, 0, 0), constant(2, 255, 0)]).unwrap();
        assert_eq!(aggregated.map_level(Band::Green, 0), 128);
        let (aggregated, _) =
            aggregate_functions(&[constant(1, 0, 0), constant(2, 0, 0), constant(2, 0, 0)]).unwrap();
        assert_eq!(aggregated.map_level(Band::Red, 0), 2);
    }
}
