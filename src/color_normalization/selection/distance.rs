use crate::color_normalization::common::Band;
use crate::color_normalization::histogram::Histogram;

/// Sum over the three bands of the Euclidean distance between bin-count vectors.
///
/// Each band is an independent 256-dimensional L2 norm; the result is not the
/// joint 768-dimensional norm.
pub fn histogram_distance(a: &Histogram, b: &Histogram) -> f64 {
    Band::ALL
        .into_iter()
        .map(|band| band_distance(a.band(band), b.band(band)))
        .sum()
}

fn band_distance(a: &[u64], b: &[u64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let diff = x as f64 - y as f64;
            diff * diff
        })
        .sum::<f64>()
        .sqrt()
}
